//! Pseudo-ledger queries and simulated chain calls

use serde_json::json;
use skychain_chain::{generate_wallet_address, is_well_formed_token, network};
use skychain_domain::requests::{ContractRequest, SignatureCheck, VerifySignatureRequest};
use skychain_domain::transaction::DEFAULT_GAS_PRICE_WEI;
use skychain_domain::{EntityType, LedgerTransaction, TransactionType};
use skychain_store::{LedgerHealth, Page, PageRequest, TransactionFilter};
use tracing::info;

use crate::error::{FleetError, Result};
use crate::service::FleetService;
use crate::views::{ContractOutcome, NetworkOverview, TransactionSummary};

/// Transactions shown alongside the network figures
const RECENT_TRANSACTIONS: usize = 10;

impl FleetService {
    /// Simulated network figures, with the real ledger size
    pub fn network_overview(&self) -> Result<NetworkOverview> {
        let (count, recent) = self.store.read(|tx| -> Result<_> {
            Ok((tx.transaction_count()?, tx.recent_transactions(RECENT_TRANSACTIONS)?))
        })?;

        let mut stats = network::network_stats();
        stats.total_transactions = count;
        Ok(NetworkOverview {
            stats,
            recent_transactions: recent.iter().map(TransactionSummary::from).collect(),
        })
    }

    pub fn list_transactions(&self, filter: &TransactionFilter, page: PageRequest) -> Result<Page<LedgerTransaction>> {
        Ok(self.store.read(|tx| tx.list_transactions(filter, page))?)
    }

    pub fn get_transaction(&self, transaction_hash: &str) -> Result<LedgerTransaction> {
        self.store
            .read(|tx| tx.get_transaction(transaction_hash))?
            .ok_or_else(|| FleetError::not_found("Transaction"))
    }

    /// Ledger records about one entity, newest first
    pub fn entity_transactions(&self, entity_type: EntityType, entity_id: &str) -> Result<Vec<LedgerTransaction>> {
        Ok(self.store.read(|tx| tx.entity_transactions(entity_type, entity_id))?)
    }

    /// Simulate a contract call and record it on the ledger
    pub fn execute_contract(&self, request: &ContractRequest) -> Result<ContractOutcome> {
        let now = self.now();
        let call = request.validate()?;
        let execution = network::execute_contract(&call.contract_address, &call.method, &call.params, now)?;
        let entity_id = call.entity_id.clone().unwrap_or_else(Self::new_id);

        let mut record = self.ledger_record(
            TransactionType::SmartContractDeployment,
            (call.entity_type, &entity_id),
            &generate_wallet_address(),
            &call.contract_address,
            json!({
                "method": call.method,
                "params": call.params,
                "result": execution,
            }),
            now,
        )?;
        record.transaction_hash = execution.transaction_hash.clone();
        record.block_number = execution.block_number;
        record.gas_used = execution.gas_used;
        record.network_fee = LedgerTransaction::compute_network_fee(execution.gas_used, DEFAULT_GAS_PRICE_WEI);

        self.store.write(|tx| tx.append_transaction(&record))?;

        info!(
            contract = %call.contract_address,
            method = %call.method,
            transaction_hash = %record.transaction_hash,
            "Contract executed"
        );
        Ok(ContractOutcome {
            success: true,
            transaction: execution,
            record,
        })
    }

    /// Format check only; nothing is verified cryptographically
    pub fn verify_signature(&self, request: &VerifySignatureRequest) -> Result<SignatureCheck> {
        let signature = request.validate()?;
        Ok(SignatureCheck {
            is_valid: is_well_formed_token(&signature),
            signature,
            timestamp: self.now(),
            verification_method: "blockchain".to_string(),
        })
    }

    /// Health of the ledger as last checked
    pub fn ledger_health(&self) -> LedgerHealth {
        self.store.ledger_health()
    }
}
