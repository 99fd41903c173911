//! Qualification of type names written in Java sources.

use std::sync::LazyLock;

use published_core::types::collections::{FxHashMap, FxHashSet};
use regex::Regex;

static TYPE_NAME: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z_$][A-Za-z0-9_$]*(?:\s*\.\s*[A-Za-z_$][A-Za-z0-9_$]*)*").ok()
});

static TYPE_ANNOTATION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"@[A-Za-z0-9_$.]+(?:\([^)]*\))?\s*").ok());

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void", "extends",
    "super", "var",
];

const JAVA_LANG: &[&str] = &[
    "Object", "String", "StringBuilder", "StringBuffer", "CharSequence", "Boolean", "Byte",
    "Character", "Short", "Integer", "Long", "Float", "Double", "Number", "Void", "Class",
    "ClassLoader", "Enum", "Record", "Iterable", "Comparable", "Runnable", "Thread",
    "ThreadLocal", "Throwable", "Exception", "RuntimeException", "Error", "Math", "System",
    "Process", "Runtime", "AutoCloseable", "Cloneable", "Deprecated", "Override",
    "SuppressWarnings", "FunctionalInterface", "SafeVarargs", "IllegalArgumentException",
    "IllegalStateException", "NullPointerException", "UnsupportedOperationException",
    "IndexOutOfBoundsException", "ClassCastException", "ArithmeticException",
    "ArrayIndexOutOfBoundsException", "CloneNotSupportedException", "InterruptedException",
    "NumberFormatException", "ReflectiveOperationException", "ClassNotFoundException",
    "SecurityException", "AssertionError", "OutOfMemoryError", "StackOverflowError",
    "LinkageError", "NoSuchMethodException", "NoSuchFieldException", "InstantiationException",
    "IllegalAccessException", "Appendable", "Readable",
];

/// Common JDK types reachable through on-demand imports of these packages.
const JDK_PACKAGES: &[(&str, &[&str])] = &[
    (
        "java.util",
        &[
            "List", "ArrayList", "LinkedList", "Map", "HashMap", "LinkedHashMap", "TreeMap",
            "SortedMap", "NavigableMap", "Set", "HashSet", "LinkedHashSet", "TreeSet", "SortedSet",
            "Collection", "Collections", "Iterator", "ListIterator", "Optional", "Properties",
            "Date", "Calendar", "Locale", "UUID", "Arrays", "Objects", "Queue", "Deque",
            "ArrayDeque", "Comparator", "Enumeration", "EnumMap", "EnumSet", "TimeZone",
            "Random", "Scanner", "Stack", "Vector", "Hashtable", "BitSet", "Currency",
        ],
    ),
    (
        "java.util.function",
        &[
            "Function", "BiFunction", "Supplier", "Consumer", "BiConsumer", "Predicate",
            "BiPredicate", "UnaryOperator", "BinaryOperator",
        ],
    ),
    (
        "java.io",
        &[
            "File", "InputStream", "OutputStream", "Reader", "Writer", "IOException",
            "Serializable", "Closeable", "BufferedReader", "BufferedWriter", "PrintWriter",
            "PrintStream", "FileInputStream", "FileOutputStream", "UncheckedIOException",
            "FileNotFoundException",
        ],
    ),
    ("java.math", &["BigDecimal", "BigInteger", "RoundingMode"]),
    ("java.nio.charset", &["Charset", "StandardCharsets"]),
    ("java.nio.file", &["Path", "Paths", "Files"]),
    (
        "java.sql",
        &["Connection", "ResultSet", "SQLException", "Timestamp", "Statement", "PreparedStatement"],
    ),
    (
        "java.time",
        &["LocalDate", "LocalDateTime", "LocalTime", "Instant", "Duration", "ZonedDateTime"],
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub name: String,
    pub on_demand: bool,
    pub is_static: bool,
}

/// Everything in scope at a declaration.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub package: String,
    pub imports: Vec<Import>,
    /// Qualified names of the enclosing types, outermost first.
    pub enclosing: Vec<String>,
    pub type_params: Vec<String>,
}

impl Scope {
    pub fn with_type_params(&self, params: &[String]) -> Scope {
        let mut scope = self.clone();
        scope.type_params.extend(params.iter().cloned());
        scope
    }

    pub fn nested(&self, qualified_name: &str, params: &[String]) -> Scope {
        let mut scope = self.with_type_params(params);
        scope.enclosing.push(qualified_name.to_string());
        scope
    }
}

/// Known qualified type names and string constants across all loaded
/// sources.
#[derive(Debug, Default)]
pub struct TypeIndex {
    known: FxHashSet<String>,
    /// `com.acme.Tags.ARCHITECT` -> `architect`.
    constants: FxHashMap<String, String>,
}

impl TypeIndex {
    pub fn insert(&mut self, qualified_name: String) {
        self.known.insert(qualified_name);
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.known.contains(qualified_name)
    }

    pub fn insert_constant(&mut self, qualified_type: &str, name: &str, value: String) {
        self.constants.insert(format!("{qualified_type}.{name}"), value);
    }

    /// Value of a string constant named as it is written in source:
    /// `NAME` (enclosing types, then static imports), `Type.NAME` or a fully
    /// qualified name.
    pub fn resolve_constant(&self, name: &str, scope: &Scope) -> Option<&str> {
        if let Some((owner, field)) = name.rsplit_once('.') {
            let owner = self.qualify_name(owner, scope);
            return self.constants.get(&format!("{owner}.{field}")).map(String::as_str);
        }
        let enclosing = scope.enclosing.iter().rev().map(|outer| format!("{outer}.{name}"));
        let imported = scope.imports.iter().filter(|i| i.is_static).filter_map(|i| {
            if i.on_demand {
                Some(format!("{}.{name}", i.name))
            } else {
                (i.name.rsplit('.').next() == Some(name)).then(|| i.name.clone())
            }
        });
        enclosing
            .chain(imported)
            .find_map(|candidate| self.constants.get(&candidate))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Qualify every type name inside a type expression
    /// (`Map<K, List<Foo>>[]`). Annotations are dropped, whitespace
    /// normalized.
    pub fn qualify_type(&self, text: &str, scope: &Scope) -> String {
        let text = match TYPE_ANNOTATION.as_ref() {
            Some(re) => re.replace_all(text, "").into_owned(),
            None => text.to_string(),
        };
        let qualified = match TYPE_NAME.as_ref() {
            Some(re) => re
                .replace_all(&text, |caps: &regex::Captures<'_>| {
                    let name: String = caps[0].chars().filter(|c| !c.is_whitespace()).collect();
                    self.resolve_name(&name, scope).unwrap_or_else(|| {
                        tracing::warn!(name = %name, package = %scope.package, "type name left unqualified");
                        name
                    })
                })
                .into_owned(),
            None => text,
        };
        normalize_type_text(&qualified)
    }

    /// Qualify a dotted name (`Foo`, `Outer.Inner`, `java.util.List`).
    /// Unresolvable names are returned unchanged.
    pub fn qualify_name(&self, name: &str, scope: &Scope) -> String {
        self.resolve_name(name, scope).unwrap_or_else(|| name.to_string())
    }

    /// Like `qualify_name`, but `None` for a type name nothing in scope
    /// accounts for. Primitives, type variables and package-qualified names
    /// resolve to themselves.
    fn resolve_name(&self, name: &str, scope: &Scope) -> Option<String> {
        if PRIMITIVES.contains(&name) {
            return Some(name.to_string());
        }
        let (first, rest) = match name.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };
        if rest.is_some() && first.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Some(name.to_string());
        }
        if rest.is_none() && scope.type_params.iter().any(|p| p == first) {
            return Some(name.to_string());
        }
        let head = self.qualify_simple(first, scope)?;
        Some(match rest {
            Some(rest) => format!("{head}.{rest}"),
            None => head,
        })
    }

    fn qualify_simple(&self, simple: &str, scope: &Scope) -> Option<String> {
        for outer in scope.enclosing.iter().rev() {
            if outer.rsplit('.').next() == Some(simple) {
                return Some(outer.clone());
            }
            let candidate = format!("{outer}.{simple}");
            if self.contains(&candidate) {
                return Some(candidate);
            }
        }
        for import in scope.imports.iter().filter(|i| !i.on_demand && !i.is_static) {
            if import.name.rsplit('.').next() == Some(simple) {
                return Some(import.name.clone());
            }
        }
        let same_package = if scope.package.is_empty() {
            simple.to_string()
        } else {
            format!("{}.{simple}", scope.package)
        };
        if self.contains(&same_package) {
            return Some(same_package);
        }
        for import in scope.imports.iter().filter(|i| i.on_demand && !i.is_static) {
            let candidate = format!("{}.{simple}", import.name);
            if self.contains(&candidate) || jdk_package_has(&import.name, simple) {
                return Some(candidate);
            }
        }
        if JAVA_LANG.contains(&simple) {
            return Some(format!("java.lang.{simple}"));
        }
        // A single on-demand import outside the table is the only place the
        // name can come from.
        let mut open = scope
            .imports
            .iter()
            .filter(|i| i.on_demand && !i.is_static)
            .filter(|i| !JDK_PACKAGES.iter().any(|(pkg, _)| *pkg == i.name));
        match (open.next(), open.next()) {
            (Some(import), None) => Some(format!("{}.{simple}", import.name)),
            _ => None,
        }
    }
}

fn jdk_package_has(package: &str, simple: &str) -> bool {
    JDK_PACKAGES
        .iter()
        .any(|(pkg, types)| *pkg == package && types.contains(&simple))
}

/// Single spaces after commas, none elsewhere.
pub fn normalize_type_text(text: &str) -> String {
    let compact: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(compact.len());
    let mut chars = compact.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            ',' => {
                out.push_str(", ");
                while chars.peek() == Some(&' ') {
                    chars.next();
                }
            }
            ' ' => {
                let prev = out.chars().last();
                let next = chars.peek().copied();
                let keep = matches!(prev, Some(p) if p.is_alphanumeric() || p == '?' || p == '>')
                    && matches!(next, Some(n) if n.is_alphanumeric() || n == '?' || n == '_' || n == '$');
                if keep {
                    out.push(' ');
                }
            }
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> Scope {
        Scope {
            package: "com.acme".into(),
            imports: vec![
                Import {
                    name: "com.other.Widget".into(),
                    on_demand: false,
                    is_static: false,
                },
                Import {
                    name: "java.util".into(),
                    on_demand: true,
                    is_static: false,
                },
            ],
            enclosing: vec!["com.acme.Outer".into()],
            type_params: vec!["T".into()],
        }
    }

    fn index() -> TypeIndex {
        let mut index = TypeIndex::default();
        index.insert("com.acme.Outer".into());
        index.insert("com.acme.Outer.Inner".into());
        index.insert("com.acme.Sibling".into());
        index
    }

    #[test]
    fn resolution_order() {
        let index = index();
        let scope = scope();
        assert_eq!(index.qualify_name("T", &scope), "T");
        assert_eq!(index.qualify_name("Inner", &scope), "com.acme.Outer.Inner");
        assert_eq!(index.qualify_name("Widget", &scope), "com.other.Widget");
        assert_eq!(index.qualify_name("Sibling", &scope), "com.acme.Sibling");
        assert_eq!(index.qualify_name("List", &scope), "java.util.List");
        assert_eq!(index.qualify_name("String", &scope), "java.lang.String");
        assert_eq!(index.qualify_name("Unknown", &scope), "Unknown");
        assert_eq!(index.qualify_name("int", &scope), "int");
        assert_eq!(index.qualify_name("java.io.File", &scope), "java.io.File");
    }

    #[test]
    fn qualify_type_expressions() {
        let index = index();
        let scope = scope();
        assert_eq!(
            index.qualify_type("Map<String,  List<T>>", &scope),
            "java.util.Map<java.lang.String, java.util.List<T>>"
        );
        assert_eq!(index.qualify_type("Sibling[]", &scope), "com.acme.Sibling[]");
        assert_eq!(
            index.qualify_type("List<? extends Widget>", &scope),
            "java.util.List<? extends com.other.Widget>"
        );
        assert_eq!(index.qualify_type("@Nullable String", &scope), "java.lang.String");
    }

    #[test]
    fn single_open_on_demand_import_qualifies_unknown_names() {
        let index = index();
        let mut scope = scope();
        scope.imports.push(Import {
            name: "java.util.concurrent".into(),
            on_demand: true,
            is_static: false,
        });
        assert_eq!(
            index.qualify_type("ConcurrentMap<String, List<T>>", &scope),
            "java.util.concurrent.ConcurrentMap<java.lang.String, java.util.List<T>>"
        );
        // Table and java.lang entries still win over the open import.
        assert_eq!(index.qualify_name("Map", &scope), "java.util.Map");
        assert_eq!(index.qualify_name("Integer", &scope), "java.lang.Integer");

        scope.imports.push(Import {
            name: "java.util.stream".into(),
            on_demand: true,
            is_static: false,
        });
        assert_eq!(index.qualify_name("ConcurrentMap", &scope), "ConcurrentMap");
    }

    #[test]
    fn constants_resolve_through_scope() {
        let mut index = index();
        index.insert("com.acme.Tags".into());
        index.insert_constant("com.acme.Tags", "ARCHITECT", "architect".into());
        index.insert_constant("com.acme.Outer", "LOCAL", "local".into());
        index.insert_constant("com.other.Roles", "OPERATOR", "operator".into());
        let mut scope = scope();

        assert_eq!(index.resolve_constant("Tags.ARCHITECT", &scope), Some("architect"));
        assert_eq!(index.resolve_constant("com.acme.Tags.ARCHITECT", &scope), Some("architect"));
        assert_eq!(index.resolve_constant("LOCAL", &scope), Some("local"));
        assert_eq!(index.resolve_constant("ARCHITECT", &scope), None);
        assert_eq!(index.resolve_constant("Tags.MISSING", &scope), None);

        scope.imports.push(Import {
            name: "com.acme.Tags.ARCHITECT".into(),
            on_demand: false,
            is_static: true,
        });
        scope.imports.push(Import {
            name: "com.other.Roles".into(),
            on_demand: true,
            is_static: true,
        });
        assert_eq!(index.resolve_constant("ARCHITECT", &scope), Some("architect"));
        assert_eq!(index.resolve_constant("OPERATOR", &scope), Some("operator"));
    }
}
