pub mod holding_service;
pub mod reconciliation_service;
