use async_graphql::{Error as GraphQLError, ErrorExtensions};

use crate::errors::{AppError, AppErrorKind};

fn error_code(kind: AppErrorKind) -> &'static str {
    match kind {
        AppErrorKind::NotFound => "NOT_FOUND",
        AppErrorKind::Validation => "VALIDATION_FAILED",
        AppErrorKind::Conflict => "CONFLICT",
        AppErrorKind::Forbidden => "FORBIDDEN",
        AppErrorKind::Unauthorized => "UNAUTHORIZED",
        AppErrorKind::Internal => "INTERNAL_ERROR",
    }
}

/// Translate an [`AppError`] into a GraphQL error carrying a machine-readable
/// `code` extension, so clients can branch on the failure class instead of
/// parsing messages. Structured error fields are copied into the extensions
/// alongside the code.
pub fn app_error_to_graphql_error(err: AppError) -> GraphQLError {
    let code = error_code(err.kind());
    GraphQLError::new(err.message().to_string()).extend_with(|_, e| {
        e.set("code", code);
        if let Some(fields) = err.fields() {
            for (key, value) in fields {
                e.set(key.as_str(), value.as_str());
            }
        }
    })
}

/// Extension trait so resolvers can finish with `?` on service results.
pub trait ResultExt<T> {
    fn to_graphql_result(self) -> Result<T, GraphQLError>;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn to_graphql_result(self) -> Result<T, GraphQLError> {
        self.map_err(app_error_to_graphql_error)
    }
}
