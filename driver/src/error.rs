use std::future::Future;
use std::time::Duration;

use error_stack::Report;
use kernel::KernelError;

/// Translates adapter-specific failures into the kernel taxonomy.
pub trait ConvertError: Sized {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

impl<T> ConvertError for Result<T, tokio::time::error::Elapsed> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| Report::new(error).change_context(KernelError::Timeout))
    }
}

/// Abandons `future` once `deadline` has passed.
pub async fn with_deadline<T, F>(deadline: Duration, future: F) -> error_stack::Result<T, KernelError>
where
    F: Future<Output = error_stack::Result<T, KernelError>>,
{
    tokio::time::timeout(deadline, future)
        .await
        .convert_error()
        .map_err(|report| report.attach_printable(format!("Deadline of {deadline:?} elapsed")))?
}
