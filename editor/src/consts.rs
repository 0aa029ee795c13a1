//! Fixed labels, storage keys and file names shared by the document model.

/// Title given to a section created without raw content ("untitled section").
pub const DEFAULT_TITLE: &str = "Название раздела";

/// Prefix of the positional menu label used when a section title is blank.
pub const MENU_FALLBACK_PREFIX: &str = "Раздел";

/// Local-storage key holding the persisted document.
pub const STORAGE_KEY: &str = "sections";

/// File name offered when the document is exported.
pub const EXPORT_FILE_NAME: &str = "base.html";

/// Element id of the sections container in rendered pages.
pub const SECTIONS_CONTAINER_ID: &str = "sections";

/// Element id of the navigation menu in rendered pages.
pub const MENU_ID: &str = "menu";

/// Display width applied to freshly inserted images.
pub const INSERTED_IMAGE_WIDTH: &str = "50%";

/// Label of the button removing an inserted image.
pub const DELETE_IMAGE_LABEL: &str = "Удалить";

/// Label of the button replacing an inserted image.
pub const REPLACE_IMAGE_LABEL: &str = "Заменить";

/// Placeholder of the editable block appended after an inserted image.
pub const CONTINUE_PLACEHOLDER: &str = "Продолжайте писать...";

/// Prefix shared by every inline PNG image source.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Content type declared on upload requests.
pub const UPLOAD_CONTENT_TYPE: &str = "text/html";

/// Request header carrying the backend session id.
pub const SESSION_HEADER: &str = "X-Session-Id";

/// Request header carrying the team id on uploads.
pub const TEAM_HEADER: &str = "X-Team-Id";
