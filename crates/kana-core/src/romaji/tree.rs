use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::{debug, debug_span};

use super::table::RomajiTable;
use crate::options::KanaOptions;

#[derive(Debug, PartialEq)]
pub enum TrieLookupResult {
    None,
    Prefix,
    Exact(String),
    ExactAndPrefix(String),
}

/// A node of the romaji prefix tree.
///
/// The path from the root spells a romaji sequence; `value` is set iff that
/// exact sequence converts to kana. A node can carry a value and children at
/// the same time (`n` → ん, but also `na`, `nya`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingNode {
    value: Option<String>,
    children: BTreeMap<char, MappingNode>,
}

impl MappingNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn child(&self, c: char) -> Option<&MappingNode> {
        self.children.get(&c)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Set the kana for `romaji`, creating intermediate nodes as needed.
    /// An existing value at that exact path is overwritten.
    ///
    /// No validation: an empty key sets the root's own value, which the
    /// tokenizer never reads.
    pub fn insert(&mut self, romaji: &str, kana: &str) {
        let mut node = self;
        for c in romaji.chars() {
            node = node.children.entry(c).or_default();
        }
        node.value = Some(kana.to_string());
    }

    pub fn get(&self, romaji: &str) -> Option<&MappingNode> {
        romaji.chars().try_fold(self, |node, c| node.child(c))
    }

    pub fn lookup(&self, romaji: &str) -> TrieLookupResult {
        let Some(node) = self.get(romaji) else {
            return TrieLookupResult::None;
        };
        match (&node.value, node.has_children()) {
            (None, false) => TrieLookupResult::None,
            (None, true) => TrieLookupResult::Prefix,
            (Some(kana), false) => TrieLookupResult::Exact(kana.clone()),
            (Some(kana), true) => TrieLookupResult::ExactAndPrefix(kana.clone()),
        }
    }

    /// Number of nodes carrying a value.
    pub fn len(&self) -> usize {
        usize::from(self.value.is_some())
            + self.children.values().map(MappingNode::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn merge<'a>(&mut self, entries: impl IntoIterator<Item = (&'a String, &'a String)>) {
        for (romaji, kana) in entries {
            self.insert(romaji, kana);
        }
    }
}

/// The shared base tree: syllables, punctuation and derived sokuon.
pub fn base_tree() -> &'static MappingNode {
    static INSTANCE: OnceLock<MappingNode> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let _span = debug_span!("base_tree").entered();
        let table = RomajiTable::global();
        let mut root = MappingNode::new();
        root.merge(&table.mappings);
        root.merge(&table.punctuation);
        root.merge(&table.sokuon_entries());
        debug!(entries = root.len());
        root
    })
}

/// Build a tree for one configuration.
///
/// Starts from a copy of [`base_tree`] and layers IME entries, obsolete kana
/// and custom overrides on top, in that order. The base tree is never
/// modified.
pub fn build_tree(
    ime_mode: bool,
    use_obsolete_kana: bool,
    custom: Option<&BTreeMap<String, String>>,
) -> MappingNode {
    let _span = debug_span!("build_tree", ime_mode, use_obsolete_kana).entered();
    let table = RomajiTable::global();
    let mut root = base_tree().clone();
    if ime_mode {
        root.merge(&table.ime);
    }
    if use_obsolete_kana {
        root.merge(&table.obsolete);
    }
    if let Some(custom) = custom {
        root.merge(custom);
    }
    debug!(
        entries = root.len(),
        custom = custom.map_or(0, BTreeMap::len)
    );
    root
}

struct CustomEntry {
    ime_mode: bool,
    use_obsolete_kana: bool,
    custom: BTreeMap<String, String>,
    tree: Arc<MappingNode>,
}

impl CustomEntry {
    fn matches(
        &self,
        ime_mode: bool,
        use_obsolete_kana: bool,
        custom: &BTreeMap<String, String>,
    ) -> bool {
        self.ime_mode == ime_mode
            && self.use_obsolete_kana == use_obsolete_kana
            && self.custom == *custom
    }
}

/// Memoized mapping trees.
///
/// The four trees without custom overrides are built once and kept. Only the
/// most recent custom-mapping tree is kept; a different mapping replaces it,
/// so editing overrides in a long-lived host does not accumulate trees.
pub struct TreeCache {
    plain: [OnceLock<Arc<MappingNode>>; 4],
    custom: Mutex<Option<CustomEntry>>,
}

impl TreeCache {
    pub const fn new() -> Self {
        Self {
            plain: [
                OnceLock::new(),
                OnceLock::new(),
                OnceLock::new(),
                OnceLock::new(),
            ],
            custom: Mutex::new(None),
        }
    }

    /// The tree for `options`, building it on a miss.
    ///
    /// Lookups borrow the options; the custom mapping is only cloned when a
    /// new tree is stored.
    pub fn get(&self, options: &KanaOptions) -> Arc<MappingNode> {
        let ime_mode = options.ime_mode.is_enabled();
        let use_obsolete_kana = options.use_obsolete_kana;
        let Some(custom) = options.custom_mapping() else {
            let tree = self.plain_slot(ime_mode, use_obsolete_kana).get_or_init(|| {
                Arc::new(build_tree(ime_mode, use_obsolete_kana, None))
            });
            return Arc::clone(tree);
        };

        // Built under the lock, so callers racing on the same mapping build it once.
        // A panic while building leaves the previous entry intact, so a poisoned slot is usable.
        let mut slot = self.custom.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = slot
            .as_ref()
            .filter(|e| e.matches(ime_mode, use_obsolete_kana, custom))
        {
            debug!("custom mapping tree cache hit");
            return Arc::clone(&entry.tree);
        }
        let tree = Arc::new(build_tree(ime_mode, use_obsolete_kana, Some(custom)));
        debug!(replaced = slot.is_some(), "custom mapping tree cached");
        *slot = Some(CustomEntry {
            ime_mode,
            use_obsolete_kana,
            custom: custom.clone(),
            tree: Arc::clone(&tree),
        });
        tree
    }

    /// Whether a tree for `options` is currently held.
    pub fn contains(&self, options: &KanaOptions) -> bool {
        let ime_mode = options.ime_mode.is_enabled();
        let use_obsolete_kana = options.use_obsolete_kana;
        match options.custom_mapping() {
            None => self.plain_slot(ime_mode, use_obsolete_kana).get().is_some(),
            Some(custom) => self
                .custom
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .as_ref()
                .is_some_and(|e| e.matches(ime_mode, use_obsolete_kana, custom)),
        }
    }

    fn plain_slot(&self, ime_mode: bool, use_obsolete_kana: bool) -> &OnceLock<Arc<MappingNode>> {
        &self.plain[usize::from(ime_mode) * 2 + usize::from(use_obsolete_kana)]
    }
}

impl Default for TreeCache {
    fn default() -> Self {
        Self::new()
    }
}

/// [`TreeCache::get`] on the process-wide cache.
pub fn mapping_tree(options: &KanaOptions) -> Arc<MappingNode> {
    static CACHE: TreeCache = TreeCache::new();
    CACHE.get(options)
}
