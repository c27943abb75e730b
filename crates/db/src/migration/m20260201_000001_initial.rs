//! Initial schema: users, parties, accounts, ledger, obligations, donations,
//! categories.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS movements, obligations, donations, categories, \
             beneficiaries, counterparties, accounts, users CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
-- Users
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username VARCHAR(64) NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Counterparties (suppliers and donors)
CREATE TABLE counterparties (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    kind VARCHAR(16) NOT NULL CHECK (kind IN ('supplier', 'donor')),
    name VARCHAR(255) NOT NULL,
    tax_id VARCHAR(32),
    phone VARCHAR(32),
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Beneficiaries
CREATE TABLE beneficiaries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    tax_id VARCHAR(32),
    phone VARCHAR(32),
    guardian_name VARCHAR(255),
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Accounts (one running balance each)
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    kind VARCHAR(16) NOT NULL CHECK (kind IN ('cash', 'bank')),
    initial_balance NUMERIC(15, 2) NOT NULL DEFAULT 0,
    current_balance NUMERIC(15, 2) NOT NULL DEFAULT 0,
    opened_on DATE NOT NULL DEFAULT CURRENT_DATE,
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Movements: the unified ledger
CREATE TABLE movements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    account_id UUID NOT NULL REFERENCES accounts(id),
    direction VARCHAR(8) NOT NULL CHECK (direction IN ('in', 'out')),
    amount NUMERIC(15, 2) NOT NULL CHECK (amount > 0),
    occurred_at TIMESTAMPTZ NOT NULL,
    description TEXT NOT NULL,
    category VARCHAR(255),
    origin_kind VARCHAR(16) NOT NULL
        CHECK (origin_kind IN ('payable', 'receivable', 'donation', 'adjustment')),
    origin_id UUID,
    recorded_by UUID NOT NULL REFERENCES users(id),
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_origin_id_presence CHECK (
        (origin_kind = 'adjustment') = (origin_id IS NULL)
    )
);

-- At most one movement per settlement origin
CREATE UNIQUE INDEX idx_movements_origin
    ON movements(origin_kind, origin_id)
    WHERE origin_kind <> 'adjustment';

CREATE INDEX idx_movements_account ON movements(account_id, occurred_at DESC);
CREATE INDEX idx_movements_occurred ON movements(occurred_at);

-- Obligations: payables and receivables
CREATE TABLE obligations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    kind VARCHAR(16) NOT NULL CHECK (kind IN ('payable', 'receivable')),
    counterparty_id UUID NOT NULL REFERENCES counterparties(id),
    beneficiary_id UUID REFERENCES beneficiaries(id),
    status VARCHAR(16) NOT NULL CHECK (status IN ('pending', 'settled')),
    category VARCHAR(255) NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id),
    issued_on DATE NOT NULL,
    due_on DATE NOT NULL,
    settled_on DATE,
    amount NUMERIC(15, 2) NOT NULL CHECK (amount > 0),
    payment_method VARCHAR(255),
    note TEXT,
    recurring BOOLEAN NOT NULL DEFAULT false,
    installment_count INTEGER NOT NULL DEFAULT 1 CHECK (installment_count >= 1),
    installment_no INTEGER NOT NULL DEFAULT 1 CHECK (installment_no >= 1),
    recurrence_group_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_installment_no_in_range CHECK (installment_no <= installment_count),
    CONSTRAINT chk_beneficiary_payable_only CHECK (
        beneficiary_id IS NULL OR kind = 'payable'
    )
);

CREATE INDEX idx_obligations_due ON obligations(due_on);
CREATE INDEX idx_obligations_status ON obligations(kind, status);
CREATE INDEX idx_obligations_group ON obligations(recurrence_group_id)
    WHERE recurrence_group_id IS NOT NULL;

-- One-off donations
CREATE TABLE donations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    donor_name VARCHAR(255) NOT NULL,
    phone VARCHAR(32),
    amount NUMERIC(15, 2) NOT NULL CHECK (amount > 0),
    account_id UUID NOT NULL REFERENCES accounts(id),
    given_on DATE NOT NULL,
    received BOOLEAN NOT NULL DEFAULT false,
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_donations_given ON donations(given_on);

-- Consolidated categorical lookup lists
CREATE TABLE categories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    kind VARCHAR(24) NOT NULL CHECK (
        kind IN ('help', 'payable', 'receivable', 'payment_method', 'receivable_source')
    ),
    name VARCHAR(255) NOT NULL,
    description TEXT,
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_categories_kind_name UNIQUE (kind, name)
);
";
