use serde::Serialize;

/// One `gene -> KO` link from `/link/ko/{org}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneKoRecord {
    pub gene_id: String,
    pub ko_id: String,
}

/// Parses a `/link/ko/{org}` body. Lines that do not have exactly two
/// tab-separated fields are skipped.
pub fn parse_link_lines(text: &str) -> Vec<GeneKoRecord> {
    text.trim()
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let gene = fields.next()?;
            let ko = fields.next()?;
            if fields.next().is_some() {
                return None;
            }
            Some(GeneKoRecord {
                gene_id: after_last_colon(gene).to_string(),
                ko_id: after_last_colon(ko).to_string(),
            })
        })
        .collect()
}

/// Parses a `/list/ko` body into `(ko_id, description)` pairs. The second
/// field is kept verbatim; extra fields are ignored.
pub fn parse_list_lines(text: &str) -> Vec<(String, String)> {
    text.trim()
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let key = fields.next()?;
            let description = fields.next()?;
            Some((after_last_colon(key).to_string(), description.to_string()))
        })
        .collect()
}

fn after_last_colon(field: &str) -> &str {
    field.rsplit(':').next().unwrap_or(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_prefix_after_last_colon() {
        let records = parse_link_lines("path:eco:b0001\tko:K01234");
        assert_eq!(records[0].gene_id, "b0001");
        assert_eq!(records[0].ko_id, "K01234");
    }

    #[test]
    fn field_without_colon_is_kept_whole() {
        let records = parse_link_lines("b0001\tK01234");
        assert_eq!(records[0].gene_id, "b0001");
    }

    #[test]
    fn list_lines_need_two_fields() {
        let entries = parse_list_lines("ko:K00001\tE1.1.1.1, adh; alcohol dehydrogenase\nko:K00002");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "K00001");
    }
}
