/// Generate SQL migrations for the glossary tables
///
/// Every statement is idempotent so the list can be replayed on each start.
/// Synonyms and tags are ordered `TEXT[]` columns; search flattens them with
/// `array_to_string(.., ',')`.
pub fn generate_migrations() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "20240501000000_terms",
            r#"
            CREATE TABLE IF NOT EXISTS terms (
                id BIGSERIAL PRIMARY KEY,
                term VARCHAR(255) NOT NULL,
                definition TEXT NOT NULL CHECK (length(btrim(definition)) > 0),
                synonyms TEXT[] NOT NULL DEFAULT '{}',
                tags TEXT[] NOT NULL DEFAULT '{}',
                source_title VARCHAR(512),
                source_authors VARCHAR(512),
                source_year INTEGER,
                source_link VARCHAR(1024),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );

            -- Case-insensitive key uniqueness
            CREATE UNIQUE INDEX IF NOT EXISTS ux_terms_term_lower ON terms (lower(term));
            "#,
        ),
        (
            "20240501000100_relations",
            r#"
            CREATE TABLE IF NOT EXISTS relations (
                id BIGSERIAL PRIMARY KEY,
                source_id BIGINT NOT NULL REFERENCES terms(id) ON DELETE CASCADE,
                target_id BIGINT NOT NULL REFERENCES terms(id) ON DELETE CASCADE,
                type VARCHAR(64) NOT NULL CHECK (
                    type IN ('is-a', 'part-of', 'related-to', 'synonym-of', 'derived-from')
                )
            );

            CREATE INDEX IF NOT EXISTS idx_relations_source_id ON relations(source_id);
            CREATE INDEX IF NOT EXISTS idx_relations_target_id ON relations(target_id);
            CREATE INDEX IF NOT EXISTS idx_relations_type ON relations(type);

            -- Widen tables created with the earlier VARCHAR(32) column
            ALTER TABLE relations ALTER COLUMN type TYPE VARCHAR(64);
            "#,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use glossary_core::RelationType;

    #[test]
    fn migrations_are_ordered_and_named() {
        let migrations = generate_migrations();
        let names: Vec<&str> = migrations.iter().map(|(name, _)| *name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn relation_check_lists_every_type() {
        let relations_sql = generate_migrations()
            .into_iter()
            .find(|(name, _)| name.ends_with("relations"))
            .map(|(_, sql)| sql)
            .unwrap();
        for kind in RelationType::ALL {
            assert!(relations_sql.contains(&format!("'{}'", kind.as_str())));
        }
        assert!(relations_sql.contains("ON DELETE CASCADE"));
        assert!(relations_sql.contains("type VARCHAR(64) NOT NULL"));
        for column in ["source_id", "target_id", "type"] {
            assert!(
                relations_sql.contains(&format!("ON relations({})", column)),
                "missing index on relations.{}",
                column
            );
        }
    }
}
