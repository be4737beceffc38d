//! # Record
//!
//! The contract every persisted gateway record fulfils.
//!
//! A record knows its table, its identity, the timestamp it is listed by,
//! its natural keys (the schema's unique columns) and, for records that carry
//! an `is_primary` / `is_default` flag, which owner that flag is exclusive
//! within. Stores use this to enforce uniqueness and flag exclusivity
//! generically; [`Record::prepare`] recomputes derived columns before every
//! write.

use crate::domain::errors::DomainResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Owner scope of an exclusive `is_primary` / `is_default` flag.
///
/// Records with a flag that is exclusive across the whole table use
/// [`ExclusiveFlag::GLOBAL_OWNER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusiveFlag {
    /// Owner the flag is exclusive within.
    pub owner: Uuid,
    /// Whether this record currently carries the flag.
    pub set: bool,
}

impl ExclusiveFlag {
    /// Owner used for table-wide exclusivity.
    pub const GLOBAL_OWNER: Uuid = Uuid::nil();

    /// Flag scoped to `owner`.
    #[must_use]
    pub const fn scoped(owner: Uuid, set: bool) -> Self {
        Self { owner, set }
    }

    /// Flag exclusive across the whole table.
    #[must_use]
    pub const fn global(set: bool) -> Self {
        Self {
            owner: Self::GLOBAL_OWNER,
            set,
        }
    }
}

/// A persisted gateway record.
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Backing table name.
    const TABLE: &'static str;

    /// Plural noun used in listings ("wallets", "trading pairs").
    const PLURAL: &'static str;

    /// Serialized name of the exclusive flag field, if the record has one.
    const EXCLUSIVE_FIELD: Option<&'static str> = None;

    /// Primary key.
    fn id(&self) -> Uuid;

    /// Timestamp records are listed by, newest first.
    fn listed_at(&self) -> DateTime<Utc>;

    /// Values that must be unique across the table, tagged by column.
    fn natural_keys(&self) -> Vec<String> {
        Vec::new()
    }

    /// Exclusive flag carried by this record, if any.
    fn exclusive_flag(&self) -> Option<ExclusiveFlag> {
        None
    }

    /// Clears the exclusive flag. Called on siblings when another record
    /// of the same owner takes the flag.
    fn clear_exclusive_flag(&mut self) {}

    /// Checks field-level rules (ranges, address formats).
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    fn validate(&self) -> DomainResult<()> {
        Ok(())
    }

    /// Recomputes derived columns and refreshes `updated_at`.
    fn prepare(&mut self, _now: DateTime<Utc>) {}
}

/// Builds a tagged natural key, `column=value`.
#[must_use]
pub fn key(column: &str, value: impl std::fmt::Display) -> String {
    format!("{column}={value}")
}

/// Implements [`Record`] for a struct with `id`, a listing timestamp column
/// and an `updated_at` column, with optional natural keys and exclusive flag.
macro_rules! impl_record {
    (
        $ty:ty, table = $table:literal, plural = $plural:literal, listed_by = $listed:ident
        $(, updated = $updated:ident)?
        $(, validate = $validate:path)?
        $(, keys = |$kself:ident| $keys:expr)?
        $(, exclusive = |$fself:ident| ($owner:expr, $flag:ident))?
        $(, prepare = |$pself:ident, $pnow:ident| $prepare:block)?
    ) => {
        impl $crate::domain::entities::record::Record for $ty {
            const TABLE: &'static str = $table;
            const PLURAL: &'static str = $plural;

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn listed_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.$listed
            }

            $(
                fn validate(&self) -> $crate::domain::errors::DomainResult<()> {
                    $validate(self)
                }
            )?

            $(
                fn natural_keys(&self) -> Vec<String> {
                    let $kself = self;
                    $keys
                }
            )?

            $(
                const EXCLUSIVE_FIELD: Option<&'static str> = Some(stringify!($flag));

                fn exclusive_flag(&self) -> Option<$crate::domain::entities::record::ExclusiveFlag> {
                    let $fself = self;
                    Some($crate::domain::entities::record::ExclusiveFlag {
                        owner: $owner,
                        set: $fself.$flag,
                    })
                }

                fn clear_exclusive_flag(&mut self) {
                    self.$flag = false;
                }
            )?

            #[allow(unused_variables)]
            fn prepare(&mut self, now: ::chrono::DateTime<::chrono::Utc>) {
                $(self.$updated = now;)?
                $(
                    let $pself = self;
                    let $pnow = now;
                    $prepare
                )?
            }
        }
    };
}

pub(crate) use impl_record;
