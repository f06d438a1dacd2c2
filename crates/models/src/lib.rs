//! Typed records for the HUMPBANK backend tables.
//!
//! Each entity comes as three shapes: the stored row, a create input (no `id`,
//! the backend assigns it) and a partial-update patch. Inputs and patches carry
//! their own validation so bad data never reaches the backend.

pub mod errors;
pub mod record;
pub mod validate;

pub mod account;
pub mod customer;
pub mod dashboard;
pub mod loan;
pub mod loan_product;
pub mod notification;
pub mod transaction;
pub mod user;

pub use account::{Account, AccountPatch, AccountStatus, AccountType, NewAccount};
pub use customer::{Customer, CustomerPatch, KycStatus, NewCustomer};
pub use dashboard::DashboardStats;
pub use errors::ModelError;
pub use loan::{Loan, LoanPatch, LoanStatus, NewLoan};
pub use loan_product::{LoanProduct, LoanProductPatch, NewLoanProduct};
pub use notification::{NewNotification, Notification, NotificationPatch};
pub use record::{Record, SortOrder, Validate};
pub use transaction::{NewTransaction, Transaction, TransactionPatch, TransactionType};
pub use user::{NewUser, User, UserPatch, UserRole};
