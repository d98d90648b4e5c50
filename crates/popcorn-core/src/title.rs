use std::rc::Rc;

/// Whatever shows the window or page title.
pub trait TitleSink {
    fn set_title(&self, title: &str);
}

pub fn movie_title(title: &str) -> String {
    format!("Movie | {}", title)
}

/// Holds the title while alive; dropping it puts the default back.
pub struct TitleScope {
    sink: Rc<dyn TitleSink>,
    default_title: String,
}

impl TitleScope {
    pub fn acquire(sink: Rc<dyn TitleSink>, title: &str, default_title: impl Into<String>) -> Self {
        sink.set_title(title);
        Self {
            sink,
            default_title: default_title.into(),
        }
    }
}

impl Drop for TitleScope {
    fn drop(&mut self) {
        self.sink.set_title(&self.default_title);
    }
}

impl std::fmt::Debug for TitleScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleScope")
            .field("default_title", &self.default_title)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingTitle;
    use super::*;

    #[test]
    fn test_scope_restores_default() {
        let sink = Rc::new(RecordingTitle::default());
        {
            let _scope = TitleScope::acquire(sink.clone(), &movie_title("Heat"), "usePopcorn");
            assert_eq!(sink.current().as_deref(), Some("Movie | Heat"));
        }
        assert_eq!(sink.current().as_deref(), Some("usePopcorn"));
    }
}
