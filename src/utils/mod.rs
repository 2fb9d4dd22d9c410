//! The `utils` module holds pieces shared by every layer of `eventsub`:
//! the error types and the logging bootstrap.

pub mod error;
pub mod logging;

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::error::{BrokerError, Error, StoreError};
    use super::logging;

    #[test]
    fn logging_parses_level_names() {
        assert_eq!(logging::parse_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(logging::parse_level(" warning "), Some(Level::WARN));
        assert_eq!(logging::parse_level("trace"), Some(Level::TRACE));
        assert_eq!(logging::parse_level("nonsense"), None);
    }

    #[test]
    fn logging_init_falls_back_to_info() {
        assert_eq!(logging::init("nonsense"), Level::INFO);
        assert_eq!(logging::init("error"), Level::ERROR);
    }

    #[test]
    fn store_errors_render_entity_and_id() {
        let err = StoreError::NotFound {
            entity: "post",
            id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "post not found: 42");
    }

    #[test]
    fn layer_errors_convert_transparently() {
        let err: Error = BrokerError::InvalidTopic(" ".to_string()).into();
        assert!(matches!(err, Error::Broker(_)));
        assert_eq!(err.to_string(), "invalid topic name: \" \"");
    }
}
