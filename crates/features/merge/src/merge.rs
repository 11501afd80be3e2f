use crate::document::{DomainDocument, EntryBlock};
use crate::load::{StoredField, StoredFilter, StoredJoin, read_block};
use joinery_domain::{DomainConfig, Entry, JoinDefinition, Preserved, Section, SectionKind};
use tracing::debug;

/// Merges a freshly generated config with the text of the previously persisted file.
///
/// Per section and key:
/// - marked entries in `existing` are kept byte-for-byte, whatever `generated` says;
/// - unmarked entries in `existing` are replaced by their generated counterpart;
/// - entries only in `existing` are retained;
/// - generated keys keep generated order, existing-only keys follow in file order.
///
/// Text outside the entries (preamble, foreign tables, unmappable headers) is carried over
/// as is. With no existing text the result is `generated` unchanged.
#[must_use]
pub fn merge(generated: DomainConfig, existing: Option<&str>) -> DomainConfig {
    match existing {
        Some(text) => merge_document(generated, &DomainDocument::parse(text)),
        None => generated,
    }
}

/// [`merge`] over an already parsed document.
#[must_use]
pub fn merge_document(generated: DomainConfig, document: &DomainDocument) -> DomainConfig {
    DomainConfig {
        fields: merge_section(generated.fields, document, SectionKind::Fields, |block| {
            read_block::<StoredField>(block).ok().map(|f| f.to_spec(&block.key))
        }),
        filters: merge_section(generated.filters, document, SectionKind::Filters, |block| {
            read_block::<StoredFilter>(block).ok().map(|f| f.to_spec(&block.key))
        }),
        joins: merge_section(generated.joins, document, SectionKind::Joins, read_join),
        preamble: document.preamble.clone(),
        foreign: document.foreign.clone(),
    }
}

fn read_join(block: &EntryBlock) -> Option<JoinDefinition> {
    read_block::<StoredJoin>(block).ok().map(|mut join| {
        join.key.clone_from(&block.key);
        join.to_definition()
    })
}

fn merge_section<T>(
    generated: Section<T>,
    document: &DomainDocument,
    kind: SectionKind,
    read: impl Fn(&EntryBlock) -> Option<T>,
) -> Section<T> {
    let preserve = |block: &EntryBlock| Preserved { text: block.text.clone(), value: read(block) };
    let mut merged = Section::with_capacity(generated.len());

    for (key, entry) in generated {
        let entry = match document.get(kind, &key) {
            Some(block) if block.customized => {
                debug!(section = %kind, key = %key, "Keeping customized entry");
                Entry::Customized(preserve(block))
            },
            _ => entry,
        };
        merged.insert(key, entry);
    }

    for block in document.section(kind) {
        if merged.contains_key(&block.key) {
            continue;
        }
        let preserved = preserve(block);
        let entry = if block.customized {
            debug!(section = %kind, key = %block.key, "Keeping customized entry absent from schema");
            Entry::Customized(preserved)
        } else {
            debug!(section = %kind, key = %block.key, "Retaining entry absent from schema");
            Entry::Retained(preserved)
        };
        merged.insert(block.key.clone(), entry);
    }

    merged
}
