//! User-facing reply texts

pub const GREETING: &str = "Привет! Я Meteorite Bot. Команды: /ping, /prices";
pub const PONG: &str = "pong ✅";
pub const OZON_NOT_CONFIGURED: &str =
    "Ozon API не настроен. Добавьте OZON_CLIENT_ID и OZON_API_KEY в .env";
pub const ACCESS_DENIED: &str = "Доступ запрещён.";
pub const OZON_ERROR_PREFIX: &str = "Ошибка Ozon API";
pub const COMMAND_FAILED_PREFIX: &str = "Ошибка";
pub const UNKNOWN_COMMAND_PREFIX: &str = "Неизвестная команда";
