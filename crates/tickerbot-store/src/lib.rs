//! Tickerbot Store - Context retrieval from the document database
//!
//! Implements the [`ContextStore`] trait against MongoDB: a case-insensitive
//! pattern search on the nested `investors.name` field of every document in
//! a fixed collection, returning each match's `investors` sub-structure.

pub mod mongo;

pub use mongo::MongoContextStore;
