//! Lease arithmetic shared by the intake drafts and the lease listing.

pub mod financials;

pub use financials::{
    days_remaining, duration_months, optional_duration, suggested_end_date, suggested_terms,
    total_lease_value, LeaseQuote,
};
