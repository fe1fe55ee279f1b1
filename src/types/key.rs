use std::fmt;

/// A component id split into its base id and repetition-depth path.
///
/// Components inside repeating groups get one `-N` suffix per enclosing group,
/// outermost group first: `kid-1-3` is row 3 of a nested group inside row 1
/// of its parent group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentKey {
    base_id: String,
    depth: Vec<usize>,
}

impl ComponentKey {
    #[must_use]
    pub fn new(base_id: impl Into<String>, depth: Vec<usize>) -> Self {
        Self {
            base_id: base_id.into(),
            depth,
        }
    }

    /// Split an id on `-`, collecting trailing numeric parts as the depth path.
    #[must_use]
    pub fn parse(id: &str) -> Self {
        let mut parts: Vec<&str> = id.split('-').collect();
        let mut depth = Vec::new();

        while let Some(last) = parts.last() {
            let numeric = !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit());
            match last.parse::<usize>() {
                Ok(row) if numeric => {
                    depth.push(row);
                    parts.pop();
                }
                _ => break,
            }
        }
        depth.reverse();

        Self {
            base_id: parts.join("-"),
            depth,
        }
    }

    #[must_use]
    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    /// Row indices, outermost repeating group first.
    #[must_use]
    pub fn depth(&self) -> &[usize] {
        &self.depth
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_id)?;
        for row in &self.depth {
            write!(f, "-{row}")?;
        }
        Ok(())
    }
}
