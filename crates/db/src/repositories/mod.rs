mod transaction_repo;
mod user_repo;

pub use transaction_repo::TransactionRepo;
pub use user_repo::UserRepo;
