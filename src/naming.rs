//! DOM id derivation.
//!
//! Sections, custom pages and entity detail panels are addressed by element
//! id: navigation links and URL fragments point at sections, cards point at
//! their detail panel. Ids come from user data, so they are normalized here
//! into a single consistent shape:
//!
//! - `"The Sunken Court"` → `the-sunken-court`
//! - `"page_17"` → `page-17`
//! - `"Ünïcode!"` → `n-code` (non-ASCII and punctuation collapse to `-`)

/// Lowercase ASCII alphanumerics; every other run of characters becomes one `-`.
pub fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_dash = false;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Detail panel ids for one entity family, in list order, e.g.
/// `character-mira-detail`.
///
/// Entities whose id has no usable characters are named by position. Ids that
/// collide after slugging get a numeric suffix (`mira-vale`, `mira-vale-2`), so
/// every panel is reachable. Sections, templates and overlays all derive panel
/// links from the full family list through this function.
pub fn panel_ids<'a>(kind: &str, entity_ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken: Vec<String> = Vec::new();
    let mut ids = Vec::new();
    for (index, raw) in entity_ids.into_iter().enumerate() {
        let mut base = slugify(raw);
        if base.is_empty() {
            base = (index + 1).to_string();
        }
        let candidate = unique(&base, &taken);
        taken.push(candidate.clone());
        ids.push(format!("{kind}-{candidate}-detail"));
    }
    ids
}

fn unique(base: &str, taken: &[String]) -> String {
    let mut candidate = base.to_string();
    let mut n = 2;
    while taken.contains(&candidate) {
        candidate = format!("{base}-{n}");
        n += 1;
    }
    candidate
}

/// Section ids for custom pages, unique among themselves and the `reserved` ids.
///
/// Collisions get a numeric suffix (`lore`, `lore-2`, ...). Pages whose id
/// slugifies to nothing are named `page-N` by position.
pub fn custom_page_ids<'a>(
    page_ids: impl IntoIterator<Item = &'a str>,
    reserved: &[&str],
) -> Vec<String> {
    let mut taken: Vec<String> = reserved.iter().map(|r| r.to_string()).collect();
    let mut ids = Vec::new();
    for (index, raw) in page_ids.into_iter().enumerate() {
        let mut base = slugify(raw);
        if base.is_empty() {
            base = format!("page-{}", index + 1);
        }
        let candidate = unique(&base, &taken);
        taken.push(candidate.clone());
        ids.push(candidate);
    }
    ids
}
