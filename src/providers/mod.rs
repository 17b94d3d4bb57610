//! Providers are the lowest layer, they reach the storefront
//! over HTTP and translate its responses to models and errors

pub mod comments;

pub use self::comments::*;
