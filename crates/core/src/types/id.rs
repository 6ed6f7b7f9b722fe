//! Typed row ids.
//!
//! Every seeded table uses a `SERIAL` primary key. Wrapping each one in its
//! own type keeps a vendor id from being passed where a category id is
//! expected, which matters when a product row takes both.

/// Declare an `i32` row id newtype.
///
/// The generated type is `Copy`, orders and hashes like its number,
/// serializes as a bare integer and converts to and from `i32`. With the
/// `postgres` feature it also maps to `INTEGER` columns.
///
/// # Example
///
/// ```rust
/// # use marketplace_core::define_id;
/// define_id!(
///     /// A storefront banner.
///     BannerId
/// );
///
/// let id = BannerId::new(3);
/// assert_eq!(id.as_i32(), 3);
/// assert_eq!(id.to_string(), "3");
/// ```
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type), sqlx(transparent))]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::convert::From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl ::core::convert::From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// `marketplace.user`
    UserId
);
define_id!(
    /// `marketplace.customer`, one per `CUSTOMER` account.
    CustomerId
);
define_id!(
    /// `marketplace.vendor`, one per `VENDOR` account.
    VendorId
);
define_id!(
    /// `marketplace.category`
    CategoryId
);
define_id!(
    /// `marketplace.product`
    ProductId
);
define_id!(
    /// `marketplace.setting`
    SettingId
);
