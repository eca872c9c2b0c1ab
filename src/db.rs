pub mod user_repo;
pub use user_repo::UserRepository;
pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod transaction_repo;
pub use transaction_repo::TransactionRepository;
