//! Dependency expression reduction.
//!
//! Turns the raw text of `DEPEND`/`RDEPEND` into a tree where USE-conditional
//! groups are already decided and plain groups are flattened. Any-of groups
//! stay nested behind an [`DepNode::AnyOf`] marker.

use std::collections::BTreeSet;

use pkgtree_util::errors::PkgtreeError;

/// One node of a reduced dependency expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepNode {
    /// A package atom that can be resolved.
    Atom(String),
    /// A `!atom` or `!!atom` blocker. Never resolves to a package.
    Blocker(String),
    /// The `||` marker preceding the group it applies to.
    AnyOf,
    /// A nested group.
    Group(Vec<DepNode>),
}

/// Reduce `raw` with the given enabled USE flags. When `match_all` is set every
/// conditional group is kept regardless of the flags.
pub fn reduce(
    raw: &str,
    use_flags: &BTreeSet<String>,
    match_all: bool,
) -> Result<Vec<DepNode>, PkgtreeError> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let mut reducer = Reducer {
        tokens: &tokens,
        pos: 0,
        use_flags,
        match_all,
    };
    let nodes = reducer.sequence(0)?;
    Ok(nodes)
}

struct Reducer<'a> {
    tokens: &'a [&'a str],
    pos: usize,
    use_flags: &'a BTreeSet<String>,
    match_all: bool,
}

impl Reducer<'_> {
    fn sequence(&mut self, depth: usize) -> Result<Vec<DepNode>, PkgtreeError> {
        let mut nodes = Vec::new();
        while let Some(&token) = self.tokens.get(self.pos) {
            self.pos += 1;
            match token {
                "(" => nodes.extend(self.sequence(depth + 1)?),
                ")" if depth == 0 => {
                    return Err(PkgtreeError::parse("unbalanced ')' in dependency string"))
                }
                ")" => return Ok(nodes),
                "||" => {
                    self.open_group("||")?;
                    let group = self.sequence(depth + 1)?;
                    nodes.push(DepNode::AnyOf);
                    nodes.push(DepNode::Group(group));
                }
                conditional if conditional.ends_with('?') => {
                    self.open_group(conditional)?;
                    let group = self.sequence(depth + 1)?;
                    if self.match_all || self.enabled(conditional) {
                        nodes.extend(group);
                    }
                }
                blocker if blocker.starts_with('!') => {
                    nodes.push(DepNode::Blocker(blocker.to_string()));
                }
                atom => nodes.push(DepNode::Atom(atom.to_string())),
            }
        }
        if depth > 0 {
            return Err(PkgtreeError::parse("unbalanced '(' in dependency string"));
        }
        Ok(nodes)
    }

    fn open_group(&mut self, after: &str) -> Result<(), PkgtreeError> {
        match self.tokens.get(self.pos) {
            Some(&"(") => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(PkgtreeError::parse(format!(
                "expected '(' after {after:?} in dependency string"
            ))),
        }
    }

    fn enabled(&self, conditional: &str) -> bool {
        let flag = conditional.trim_end_matches('?');
        match flag.strip_prefix('!') {
            Some(flag) => !self.use_flags.contains(flag),
            None => self.use_flags.contains(flag),
        }
    }
}
