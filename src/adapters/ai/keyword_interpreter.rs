//! Keyword Interpreter Adapter
//!
//! Wraps the domain keyword interpreter behind the `UtteranceInterpreter`
//! port. This is the default interpreter; it is pure and cannot fail.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::catalog::{CatalogIndex, StoreSettings};
use crate::domain::dialogue::{interpret, Interpretation};
use crate::ports::UtteranceInterpreter;

/// Port adapter over the pure keyword interpreter.
#[derive(Debug, Clone)]
pub struct KeywordInterpreter {
    index: Arc<CatalogIndex>,
    settings: Arc<StoreSettings>,
}

impl KeywordInterpreter {
    pub fn new(index: Arc<CatalogIndex>, settings: Arc<StoreSettings>) -> Self {
        Self { index, settings }
    }
}

#[async_trait]
impl UtteranceInterpreter for KeywordInterpreter {
    async fn interpret(&self, text: &str) -> Interpretation {
        interpret(&self.index, &self.settings, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::StoreFile;

    #[tokio::test]
    async fn delegates_to_the_keyword_interpreter() {
        let store: StoreFile = serde_yaml::from_str(
            r#"
catalog:
  beverages:
    - name: Coke
      aliases: [cola]
"#,
        )
        .unwrap();
        let adapter = KeywordInterpreter::new(
            Arc::new(CatalogIndex::build(&store.catalog)),
            Arc::new(store.settings),
        );

        let result = adapter.interpret("two cokes please").await;
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].qty, 2);
    }
}
