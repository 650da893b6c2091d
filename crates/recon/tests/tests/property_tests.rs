#[path = "property/null_rules.rs"]
mod null_rules;

#[path = "property/collection_matching.rs"]
mod collection_matching;
