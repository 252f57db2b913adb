use std::{collections::BTreeMap, fmt};

///
/// err
/// format a message straight into an ErrorTree
///

#[macro_export]
macro_rules! err {
    ($errs:expr, $($arg:tt)*) => {
        $errs.add(format!($($arg)*))
    };
}

///
/// ErrorTree
///
/// Route-aware error aggregation. Messages either sit at the root of the
/// tree or under a child route (a class path, usually), so a validation
/// pass can keep going and report everything it found in one go.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ErrorTree {
    messages: Vec<String>,
    children: BTreeMap<String, Self>,
}

impl ErrorTree {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
            children: BTreeMap::new(),
        }
    }

    /// Add a message at the root of the tree.
    pub fn add(&mut self, err: impl ToString) {
        self.messages.push(err.to_string());
    }

    /// Add a message under a child route.
    pub fn add_for(&mut self, route: impl Into<String>, err: impl ToString) {
        self.children
            .entry(route.into())
            .or_default()
            .add(err);
    }

    /// Merge another tree into this one at the same level.
    pub fn merge(&mut self, other: Self) {
        self.messages.extend(other.messages);

        for (route, child) in other.children {
            self.children.entry(route).or_default().merge(child);
        }
    }

    /// Merge another tree beneath a child route.
    pub fn merge_for(&mut self, route: impl Into<String>, other: Self) {
        if other.is_empty() {
            return;
        }

        self.children.entry(route.into()).or_default().merge(other);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.children.values().all(Self::is_empty)
    }

    /// Total number of messages in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len() + self.children.values().map(Self::len).sum::<usize>()
    }

    /// Flatten to `(route, message)` pairs in deterministic order.
    #[must_use]
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.flatten_into(None, &mut out);

        out
    }

    fn flatten_into(&self, prefix: Option<&str>, out: &mut Vec<(String, String)>) {
        let route = prefix.unwrap_or_default();
        for message in &self.messages {
            out.push((route.to_string(), message.clone()));
        }

        for (key, child) in &self.children {
            let nested = match prefix {
                Some(prefix) => format!("{prefix} > {key}"),
                None => key.clone(),
            };
            child.flatten_into(Some(&nested), out);
        }
    }

    /// `Ok(())` when nothing was recorded, otherwise the tree itself.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (route, message)) in self.flatten().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            if route.is_empty() {
                write!(f, "{message}")?;
            } else {
                write!(f, "{route}: {message}")?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for ErrorTree {}

///
/// TESTS
///
