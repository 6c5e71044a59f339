//! Receiver detection from raw signature text.

use std::collections::BTreeMap;

/// Receiver type names seen per function name during one run.
#[derive(Debug, Clone, Default)]
pub struct ReceiverIndex {
    entries: BTreeMap<String, Vec<String>>,
}

impl ReceiverIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `receiver` under `name`, ignoring duplicates.
    pub fn record(&mut self, name: &str, receiver: String) {
        let receivers = self.entries.entry(name.to_string()).or_default();
        if !receivers.contains(&receiver) {
            receivers.push(receiver);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Receivers recorded for `name`, in first-seen order.
    pub fn receivers(&self, name: &str) -> &[String] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, receivers)| (name.as_str(), receivers.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Recover the receiver type of a method from its signature text.
///
/// The signature is split on the first occurrence of `name`; a `)` in the
/// segment before it marks a receiver clause. The last token of that segment
/// loses every `)` and `*`, so an unnamed receiver keeps its `(`:
/// `func (Config) Reset()` yields `(Config`. Returns `None` for plain
/// functions.
///
/// ```
/// use gomap::extract::classify_receiver;
///
/// assert_eq!(
///     classify_receiver("func (v *Vector) Scale(x float64) float64", "Scale"),
///     Some("*Vector".to_string())
/// );
/// assert_eq!(classify_receiver("func Add(a, b int) int", "Add"), None);
/// ```
pub fn classify_receiver(signature: &str, name: &str) -> Option<String> {
    let head = match signature.find(name) {
        Some(idx) => &signature[..idx],
        None => signature,
    };
    if !head.contains(')') {
        return None;
    }

    let token = head.split_whitespace().last().unwrap_or("");
    let bare: String = token
        .chars()
        .filter(|c| !matches!(c, ')' | '*'))
        .collect();

    if head.contains('*') {
        Some(format!("*{}", bare))
    } else {
        Some(bare)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_receiver() {
        assert_eq!(
            classify_receiver("func (v *Vector) Scale(x float64) float64", "Scale"),
            Some("*Vector".to_string())
        );
    }

    #[test]
    fn test_value_receiver() {
        assert_eq!(
            classify_receiver("func (c Config) String() string", "String"),
            Some("Config".to_string())
        );
    }

    #[test]
    fn test_unnamed_receiver_keeps_paren() {
        assert_eq!(
            classify_receiver("func (Config) Reset()", "Reset"),
            Some("(Config".to_string())
        );
        assert_eq!(
            classify_receiver("func (*Config) Reset()", "Reset"),
            Some("*(Config".to_string())
        );
    }

    #[test]
    fn test_generic_receiver() {
        assert_eq!(
            classify_receiver("func (l *List[T]) Push(v T)", "Push"),
            Some("*List[T]".to_string())
        );
    }

    #[test]
    fn test_free_function() {
        assert_eq!(classify_receiver("func Add(a, b int) (sum int)", "Add"), None);
        assert_eq!(
            classify_receiver("func Map[T any](xs []T) []T", "Map"),
            None
        );
    }

    #[test]
    fn test_name_inside_receiver_type_hides_receiver() {
        // The split happens at the first occurrence of the name.
        assert_eq!(classify_receiver("func (s Scale) Scale()", "Scale"), None);
    }

    #[test]
    fn test_index_deduplicates() {
        let mut index = ReceiverIndex::new();
        index.record("Close", "*File".to_string());
        index.record("Close", "*Conn".to_string());
        index.record("Close", "*File".to_string());

        assert!(index.contains("Close"));
        assert!(!index.contains("Open"));
        assert_eq!(index.receivers("Close"), &["*File", "*Conn"]);
        assert_eq!(index.iter().count(), 1);
    }
}
