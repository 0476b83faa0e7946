use crate::model::TriggerRule;

/// Find the rule that answers `text`, if any.
///
/// Rules are tested in declaration order and the first rule with at least
/// one keyword contained in the lower-cased text wins; later rules are
/// never considered even if they would also match. No match yields `None`.
/// Keywords are already lower-cased at config load.
pub fn match_rule<'a>(rules: &'a [TriggerRule], text: &str) -> Option<&'a TriggerRule> {
    let lowered = text.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lowered.contains(kw.as_str())))
}
