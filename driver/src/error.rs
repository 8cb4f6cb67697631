use error_stack::Report;
use kernel::KernelError;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    SqlX(sqlx::Error),
    #[error(transparent)]
    Migrate(sqlx::migrate::MigrateError),
    #[error(transparent)]
    Env(dotenvy::Error),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl From<sqlx::Error> for DriverError {
    fn from(value: sqlx::Error) -> Self {
        Self::SqlX(value)
    }
}

impl From<sqlx::migrate::MigrateError> for DriverError {
    fn from(value: sqlx::migrate::MigrateError) -> Self {
        Self::Migrate(value)
    }
}

impl From<dotenvy::Error> for DriverError {
    fn from(value: dotenvy::Error) -> Self {
        Self::Env(value)
    }
}

pub trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

impl<T> ConvertError for Result<T, DriverError> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = match &error {
                DriverError::SqlX(sqlx::Error::PoolTimedOut) => KernelError::Timeout,
                // another writer inserted the same key or default first
                DriverError::SqlX(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                    KernelError::Concurrency
                }
                _ => KernelError::Internal,
            };
            Report::new(error).change_context(context)
        })
    }
}

impl<T> ConvertError for Result<T, sqlx::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(DriverError::from).convert_error()
    }
}
