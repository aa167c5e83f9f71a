// All service modules
pub mod identity;
pub mod onchain;

// Re-export for convenience
pub use identity::{IdentityProvider, WalletIdentity};
pub use onchain::{CheckersContract, LedgerGateway};
