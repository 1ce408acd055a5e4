use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Превышено время ожидания: {0}")]
    Timeout(String),

    #[error("Проверка не выполнена: {0}")]
    ProbeFailed(String),

    #[error("ОС отклонила запуск обработчика: {0}")]
    Launch(String),

    #[error("Некорректный номер телефона: {0}")]
    InvalidNumber(String),

    #[error("Некорректное имя контакта: {0}")]
    InvalidContact(String),

    #[error("Неподдерживаемая платформа: {0}")]
    UnsupportedPlatform(String),
}

impl AssistantError {
    pub fn probe_failed<T>(msg: impl Into<String>) -> Result<T> {
        Err(AssistantError::ProbeFailed(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! assistant_error {
    (timeout, $($arg:tt)*) => {
        $crate::error::AssistantError::Timeout(format!($($arg)*))
    };
    (probe_failed, $($arg:tt)*) => {
        $crate::error::AssistantError::ProbeFailed(format!($($arg)*))
    };
    (launch, $($arg:tt)*) => {
        $crate::error::AssistantError::Launch(format!($($arg)*))
    };
    (invalid_number, $($arg:tt)*) => {
        $crate::error::AssistantError::InvalidNumber(format!($($arg)*))
    };
    (invalid_contact, $($arg:tt)*) => {
        $crate::error::AssistantError::InvalidContact(format!($($arg)*))
    };
    (unsupported_platform, $($arg:tt)*) => {
        $crate::error::AssistantError::UnsupportedPlatform(format!($($arg)*))
    };
}
