//! # Domain Entities
//!
//! Gateway records grouped by product module.
//!
//! ## Modules
//!
//! - [`accounts`]: platform users
//! - [`tokens`]: MTT token, balances, transfers, prices, allowances
//! - [`wallets`]: wallet types, wallets and their addresses, transactions,
//!   backups and permissions
//! - [`merchant`]: merchants, gateways, products, API keys, transactions
//! - [`customers`]: profiles, KYC, activity, support tickets, notifications
//! - [`payments`]: payment methods, payments, rates, webhooks, refunds
//! - [`trading`]: pairs, orders, executions, issuance, routing, liquidity
//! - [`admin`]: configuration, ERP integration, admin panels, alerts
//! - [`marketplace`]: marketplaces, listings, orders, processors, fiat
//!
//! Every record implements [`Record`], which the persistence layer uses to
//! enforce natural keys and exclusive flags.

pub mod accounts;
pub mod admin;
pub mod customers;
pub mod marketplace;
pub mod merchant;
pub mod payments;
pub mod record;
pub mod tokens;
pub mod trading;
pub mod wallets;

pub use accounts::User;
pub use record::{ExclusiveFlag, Record};
