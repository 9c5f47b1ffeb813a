//! `appcall` core: wire values, the document codec, routes and function call documents.

pub mod codec;
pub mod error;
pub mod function_call;
pub mod route;
pub mod value;

pub use codec::{Codec, CodecError};
pub use error::{CallError, ServerError};
pub use function_call::FunctionCallRequest;
pub use route::AppRoutes;
pub use value::{Document, Value};

#[cfg(test)]
mod tests {
    #[test]
    fn crate_loads() {
        // Empty body: if this test runs, the crate compiles and loads.
    }
}
