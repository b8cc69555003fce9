//! The fleet service handle
//!
//! [`FleetService`] owns its collaborators explicitly: the store, the
//! authenticity verifier, the QR encoder and the clock are all handed in by
//! whoever builds it. Operations are synchronous; async callers should run them
//! on a blocking thread.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde_json::{json, Value};
use skychain_chain::{
    hash_token, random_block_hash, AuthenticityVerifier, DataUrlQrEncoder, FixedVerifier,
    QrEncoder, RandomThresholdVerifier,
};
use skychain_core::{Config, SharedClock, VerifierKind};
use skychain_domain::transaction::DEFAULT_GAS_PRICE_WEI;
use skychain_domain::{EntityType, LedgerTransaction, RelatedEntity, TransactionStatus, TransactionType};
use skychain_store::Store;
use tracing::info;

use crate::error::Result;

/// Gas recorded on simple ledger writes
pub(crate) const TRANSFER_GAS: u64 = 21_000;

/// Tunables that are not collaborators
#[derive(Debug, Clone)]
pub struct FleetSettings {
    /// Recipient recorded on aircraft registration ledger entries
    pub aircraft_contract_address: String,
}

impl Default for FleetSettings {
    fn default() -> Self {
        Self {
            aircraft_contract_address: "0x0000000000000000000000000000000000000000".to_string(),
        }
    }
}

pub struct FleetService {
    pub(crate) store: Arc<Store>,
    pub(crate) verifier: Arc<dyn AuthenticityVerifier>,
    pub(crate) qr: Arc<dyn QrEncoder>,
    pub(crate) clock: SharedClock,
    pub(crate) settings: FleetSettings,
}

impl FleetService {
    pub fn new(
        store: Arc<Store>,
        verifier: Arc<dyn AuthenticityVerifier>,
        qr: Arc<dyn QrEncoder>,
        clock: SharedClock,
    ) -> Self {
        Self {
            store,
            verifier,
            qr,
            clock,
            settings: FleetSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: FleetSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Wire the verifier strategy and contract address named in `config`
    pub fn from_config(config: &Config, store: Arc<Store>, clock: SharedClock) -> Self {
        let verifier: Arc<dyn AuthenticityVerifier> = match config.chain.verifier {
            VerifierKind::Random => {
                Arc::new(RandomThresholdVerifier::new(config.chain.authenticity_threshold))
            }
            VerifierKind::AlwaysAuthentic => Arc::new(FixedVerifier::authentic()),
            VerifierKind::AlwaysCounterfeit => Arc::new(FixedVerifier::counterfeit()),
        };
        info!(verifier = ?config.chain.verifier, "Fleet service configured");

        Self::new(store, verifier, Arc::new(DataUrlQrEncoder), clock).with_settings(FleetSettings {
            aircraft_contract_address: config.chain.aircraft_contract_address.clone(),
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Build a confirmed ledger record for an entity event
    pub(crate) fn ledger_record(
        &self,
        kind: TransactionType,
        entity: (EntityType, &str),
        from: &str,
        to: &str,
        data: Value,
        now: DateTime<Utc>,
    ) -> Result<LedgerTransaction> {
        let (entity_type, entity_id) = entity;
        let transaction_hash = hash_token(
            &json!({
                "nonce": Self::new_id(),
                "type": kind.as_str(),
                "entity": entity_id,
                "data": &data,
            }),
            now,
        )?;

        Ok(LedgerTransaction {
            transaction_hash,
            block_number: rand::thread_rng().gen_range(1_000_000..2_000_000),
            block_hash: random_block_hash(),
            from: from.to_string(),
            to: to.to_string(),
            gas_used: TRANSFER_GAS,
            gas_price: DEFAULT_GAS_PRICE_WEI.to_string(),
            value: "0".to_string(),
            contract_address: None,
            status: TransactionStatus::Confirmed,
            kind,
            related_entity: RelatedEntity {
                entity_type,
                entity_id: entity_id.to_string(),
            },
            data,
            timestamp: now,
            confirmations: 0,
            network_fee: LedgerTransaction::compute_network_fee(TRANSFER_GAS, DEFAULT_GAS_PRICE_WEI),
        })
    }
}
