use std::borrow::Cow;

/// Provider identifier - the lowercase registration name ("yahoo", "tiingo", ...)
pub type ProviderId = Cow<'static, str>;
