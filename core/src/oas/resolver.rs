#![deny(missing_docs)]

//! # Schema Resolution
//!
//! Follows `$ref` chains into `components.schemas` and folds `allOf` branches
//! into a single schema.
//!
//! Cycle protection works on the *current resolution path* only: every call
//! receives the chain of component names it was reached through by value, so
//! sibling `allOf` branches never see each other's visits. A reference that
//! re-enters a name on its own path (or names a missing component) is returned
//! as the bare reference node, which downstream code treats as schema-less.

use crate::oas::document::Components;
use crate::oas::refs::extract_schema_name;
use crate::oas::schema::JsonSchema;
use std::collections::BTreeSet;

/// Component schema names entered on one resolution path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefChain(BTreeSet<String>);

impl RefChain {
    /// True if `name` was already entered on this path.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// A new chain extended with `name`.
    pub fn with(&self, name: &str) -> Self {
        let mut next = self.0.clone();
        next.insert(name.to_string());
        Self(next)
    }
}

/// The outcome of resolving one schema node.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// The dereferenced, `allOf`-merged schema.
    pub schema: JsonSchema,
    /// The chain to continue with when descending into this schema.
    pub chain: RefChain,
}

/// Resolves schemas against one document's components.
#[derive(Debug, Clone, Copy)]
pub struct SchemaResolver<'a> {
    components: &'a Components,
}

impl<'a> SchemaResolver<'a> {
    /// Creates a resolver over `components`.
    pub fn new(components: &'a Components) -> Self {
        Self { components }
    }

    /// Resolves the component schema called `name`.
    pub fn resolve_named(&self, name: &str) -> Resolved {
        match self.components.schema(name) {
            Some(target) => self.resolve(target, RefChain::default().with(name)),
            None => {
                tracing::debug!(schema = name, "component schema not found");
                Resolved {
                    schema: JsonSchema::reference(format!("#/components/schemas/{}", name)),
                    chain: RefChain::default(),
                }
            }
        }
    }

    /// Resolves `schema`, reached through `chain`.
    pub fn resolve(&self, schema: &JsonSchema, chain: RefChain) -> Resolved {
        if let Some(reference) = &schema.reference {
            return self.resolve_reference(schema, reference, chain);
        }

        if !schema.all_of.is_empty() {
            return self.merge_all_of(schema, chain);
        }

        Resolved {
            schema: schema.clone(),
            chain,
        }
    }

    fn resolve_reference(&self, node: &JsonSchema, reference: &str, chain: RefChain) -> Resolved {
        let unresolved = |chain: RefChain| Resolved {
            schema: node.clone(),
            chain,
        };

        let Some(name) = extract_schema_name(reference) else {
            tracing::debug!(reference, "reference outside components.schemas left unresolved");
            return unresolved(chain);
        };
        if chain.contains(&name) {
            tracing::debug!(reference, "cyclic reference left unresolved");
            return unresolved(chain);
        }
        let Some(target) = self.components.schema(&name) else {
            tracing::debug!(reference, "dangling reference left unresolved");
            return unresolved(chain);
        };

        let next = chain.with(&name);
        let mut resolved = self.resolve(target, next);

        // OAS 3.1 allows annotations next to $ref.
        if node.read_only == Some(true) {
            resolved.schema.read_only = Some(true);
        }
        if node.write_only == Some(true) {
            resolved.schema.write_only = Some(true);
        }
        resolved
    }

    fn merge_all_of(&self, schema: &JsonSchema, chain: RefChain) -> Resolved {
        let mut siblings = schema.clone();
        siblings.all_of.clear();

        let mut merged = JsonSchema::default();
        merge_branch(&mut merged, &siblings);

        for branch in &schema.all_of {
            let resolved = self.resolve(branch, chain.clone());
            merge_branch(&mut merged, &resolved.schema);
        }

        Resolved {
            schema: merged,
            chain,
        }
    }
}

/// Folds one resolved `allOf` branch into the accumulator.
///
/// Scalars take the last branch that sets them, flags are OR-ed,
/// `required` is a sorted union and `properties` a union where later wins.
fn merge_branch(acc: &mut JsonSchema, branch: &JsonSchema) {
    if branch.schema_type.is_some() {
        acc.schema_type = branch.schema_type.clone();
    }
    if branch.format.is_some() {
        acc.format = branch.format.clone();
    }
    if branch.enum_values.is_some() {
        acc.enum_values = branch.enum_values.clone();
    }
    if branch.items.is_some() {
        acc.items = branch.items.clone();
    }
    if !branch.one_of.is_empty() {
        acc.one_of = branch.one_of.clone();
    }
    if !branch.any_of.is_empty() {
        acc.any_of = branch.any_of.clone();
    }

    acc.read_only = merge_flag(acc.read_only, branch.read_only);
    acc.write_only = merge_flag(acc.write_only, branch.write_only);

    acc.required.extend(branch.required.iter().cloned());
    acc.required.sort();
    acc.required.dedup();

    for (name, property) in &branch.properties {
        acc.properties.insert(name.clone(), property.clone());
    }
}

fn merge_flag(acc: Option<bool>, branch: Option<bool>) -> Option<bool> {
    match (acc, branch) {
        (Some(true), _) | (_, Some(true)) => Some(true),
        (acc, branch) => acc.or(branch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::document::Document;

    fn components(yaml: &str) -> Components {
        Document::from_yaml_str(yaml).unwrap().components
    }

    #[test]
    fn test_resolve_plain_ref() {
        let comps = components(
            r#"
components:
  schemas:
    User:
      type: object
      properties:
        id: { type: string }
"#,
        );
        let resolver = SchemaResolver::new(&comps);
        let resolved = resolver.resolve(
            &JsonSchema::reference("#/components/schemas/User"),
            RefChain::default(),
        );
        assert!(resolved.schema.is_object_shaped());
        assert!(resolved.chain.contains("User"));
    }

    #[test]
    fn test_self_referencing_all_of_terminates() {
        let comps = components(
            r#"
components:
  schemas:
    A:
      allOf:
        - $ref: '#/components/schemas/A'
"#,
        );
        let resolved = SchemaResolver::new(&comps).resolve_named("A");
        assert!(resolved.schema.all_of.is_empty());
        assert!(resolved.schema.properties.is_empty());
        assert!(!resolved.schema.is_object_shaped());
    }

    #[test]
    fn test_mutual_cycle_terminates() {
        let comps = components(
            r#"
components:
  schemas:
    A:
      allOf:
        - $ref: '#/components/schemas/B'
        - properties: { a: { type: string } }
    B:
      allOf:
        - $ref: '#/components/schemas/A'
        - properties: { b: { type: integer } }
"#,
        );
        let resolved = SchemaResolver::new(&comps).resolve_named("A");
        let names: Vec<&str> = resolved.schema.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_dangling_ref_returns_node() {
        let comps = Components::default();
        let node = JsonSchema::reference("#/components/schemas/Ghost");
        let resolved = SchemaResolver::new(&comps).resolve(&node, RefChain::default());
        assert_eq!(resolved.schema, node);
    }

    #[test]
    fn test_all_of_merge_rules() {
        let comps = components(
            r#"
components:
  schemas:
    Base:
      type: object
      required: [name, id]
      properties:
        id: { type: string }
        name: { type: string }
    Merged:
      allOf:
        - $ref: '#/components/schemas/Base'
        - type: object
          format: custom
          readOnly: true
          required: [id, age]
          properties:
            id: { type: integer }
            age: { type: integer }
        - readOnly: false
"#,
        );
        let merged = SchemaResolver::new(&comps).resolve_named("Merged").schema;
        assert_eq!(merged.type_name(), Some("object"));
        assert_eq!(merged.format.as_deref(), Some("custom"));
        assert_eq!(merged.read_only, Some(true));
        assert_eq!(merged.required, vec!["age", "id", "name"]);
        assert_eq!(merged.properties["id"].type_name(), Some("integer"));
        assert_eq!(merged.properties.len(), 3);
    }

    #[test]
    fn test_sibling_branches_do_not_share_visits() {
        let comps = components(
            r#"
components:
  schemas:
    Shared:
      properties:
        shared: { type: string }
    Left:
      allOf: [{ $ref: '#/components/schemas/Shared' }, { format: left }]
    Right:
      allOf: [{ $ref: '#/components/schemas/Shared' }, { type: object }]
    Both:
      allOf:
        - $ref: '#/components/schemas/Left'
        - $ref: '#/components/schemas/Right'
"#,
        );
        let both = SchemaResolver::new(&comps).resolve_named("Both").schema;
        assert!(both.properties.contains_key("shared"));
        assert_eq!(both.format.as_deref(), Some("left"));
        assert_eq!(both.type_name(), Some("object"));
    }

    #[test]
    fn test_ref_sibling_flags_survive() {
        let comps = components(
            r#"
components:
  schemas:
    Stamp: { type: string, format: date-time }
"#,
        );
        let node: JsonSchema =
            serde_yaml::from_str("{ $ref: '#/components/schemas/Stamp', readOnly: true }").unwrap();
        let resolved = SchemaResolver::new(&comps).resolve(&node, RefChain::default());
        assert_eq!(resolved.schema.format.as_deref(), Some("date-time"));
        assert_eq!(resolved.schema.read_only, Some(true));
    }
}
