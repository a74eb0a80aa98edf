//! # SQL Keyword Vocabulary
//!
//! The keyword table is derived from the SQL grammar definition: 208
//! entries sorted by (length, text), with ids assigned in table order so
//! id `N` lives at index `N - 1`. Id 0 is reserved for [`Keyword::Unknown`].
//! Keep the table sorted; both lookup paths depend on it.
//!
//! ## Lookup Paths
//!
//! Two lookup strategies produce identical results:
//!
//! 1. **Scalar**: uppercase the lexeme into a fixed stack buffer and
//!    binary-search the (length, text)-ordered table. Used first by the
//!    tokenizer.
//! 2. **SIMD**: probe the length-bucket index for the lexeme's length,
//!    then run the dispatched `matches_keyword` kernel over each bucket
//!    entry. Exercised as a fallback and by callers that already hold a
//!    dispatcher.
//!
//! ## Reserved vs Contextual
//!
//! `is_reserved` marks entries that can never be identifiers. The
//! tokenizer does not act on the flag; it is pass-through metadata for the
//! parser.

use crate::config::{KEYWORD_COUNT, LENGTH_BUCKET_COUNT, MAX_KEYWORD_LEN};
use crate::simd::{Dispatcher, SimdOp, SimdProcessor};

/// Keyword identifier. `Unknown` (0) means "not a keyword"; ids 1..=208
/// follow the (length, text) order of [`KEYWORDS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Keyword {
    Unknown = 0,
    As = 1,
    By,
    Do,
    If,
    In,
    Is,
    No,
    Of,
    On,
    Or,
    To,
    Add,
    All,
    And,
    Asc,
    End,
    For,
    Gin,
    Int,
    Key,
    Not,
    Row,
    Set,
    Blob,
    Bool,
    Brin,
    Case,
    Cast,
    Char,
    Cube,
    Data,
    Date,
    Desc,
    Drop,
    Each,
    Else,
    From,
    Full,
    Gist,
    Hash,
    Into,
    Join,
    Json,
    Last,
    Left,
    Like,
    Next,
    Null,
    Only,
    Over,
    Plan,
    Read,
    Real,
    Rows,
    Sets,
    Temp,
    Text,
    Then,
    Ties,
    Time,
    True,
    Type,
    View,
    When,
    With,
    Work,
    Zone,
    After,
    Alter,
    Array,
    Begin,
    Btree,
    Bytea,
    Cache,
    Chain,
    Check,
    Cross,
    Cycle,
    Depth,
    False,
    Fetch,
    First,
    Float,
    Group,
    Ilike,
    Index,
    Inner,
    Jsonb,
    Level,
    Limit,
    Local,
    Nulls,
    Order,
    Outer,
    Owner,
    Pivot,
    Query,
    Range,
    Right,
    Start,
    Table,
    Union,
    Using,
    Where,
    Write,
    Action,
    Always,
    Attach,
    Before,
    Bigint,
    Binary,
    Column,
    Commit,
    Create,
    Delete,
    Detach,
    Double,
    Escape,
    Except,
    Exists,
    Filter,
    Groups,
    Having,
    Insert,
    Offset,
    Option,
    Others,
    Pragma,
    Rename,
    Rollup,
    Schema,
    Search,
    Select,
    Spgist,
    Stored,
    Unique,
    Update,
    Vacuum,
    Values,
    Window,
    Within,
    Analyze,
    Between,
    Boolean,
    Breadth,
    Cascade,
    Collate,
    Current,
    Decimal,
    Default,
    Exclude,
    Explain,
    Extract,
    Foreign,
    Instead,
    Integer,
    Lateral,
    Natural,
    Nothing,
    Numeric,
    Primary,
    Reindex,
    Release,
    Replace,
    Restart,
    Session,
    Trigger,
    Unpivot,
    Varchar,
    Varying,
    Virtual,
    Cascaded,
    Conflict,
    Database,
    Distinct,
    Grouping,
    Interval,
    Maxvalue,
    Minvalue,
    Restrict,
    Rollback,
    Sequence,
    Smallint,
    Character,
    Committed,
    Following,
    Generated,
    Increment,
    Intersect,
    Isolation,
    Partition,
    Preceding,
    Precision,
    Recursive,
    Returning,
    Savepoint,
    Statement,
    Temporary,
    Timestamp,
    Unbounded,
    Constraint,
    Deferrable,
    References,
    Repeatable,
    Transaction,
    Uncommitted,
    Serializable,
    Authorization,
}

impl Keyword {
    /// Canonical uppercase spelling ("UNKNOWN" for id 0).
    pub fn name(self) -> &'static str {
        keyword_name(self)
    }

    /// True for reserved keywords that can never be identifiers. The
    /// parser enforces this; the tokenizer only carries the flag.
    pub fn is_reserved(self) -> bool {
        match self as u16 {
            0 => false,
            id => KEYWORDS[(id - 1) as usize].reserved,
        }
    }
}

/// One vocabulary entry. `hash` is the FNV-1a hash of the uppercase text,
/// precomputed for consumers that key keyword caches by hash.
#[derive(Debug, Clone, Copy)]
pub struct KeywordEntry {
    pub text: &'static str,
    pub length: u8,
    pub hash: u32,
    pub id: Keyword,
    pub reserved: bool,
}

/// FNV-1a over the uppercased bytes, matching the grammar generator.
const fn fnv1a_upper(bytes: &[u8]) -> u32 {
    let mut hash = 0x811c_9dc5u32;
    let mut i = 0;
    while i < bytes.len() {
        let mut b = bytes[i];
        if b >= b'a' && b <= b'z' {
            b -= 0x20;
        }
        hash ^= b as u32;
        hash = hash.wrapping_mul(0x0100_0193);
        i += 1;
    }
    hash
}

const fn entry(text: &'static str, id: Keyword, reserved: bool) -> KeywordEntry {
    KeywordEntry {
        text,
        length: text.len() as u8,
        hash: fnv1a_upper(text.as_bytes()),
        id,
        reserved,
    }
}

/// The vocabulary, sorted by (length, text). Do not reorder: ids and the
/// length buckets below are positional.
pub static KEYWORDS: [KeywordEntry; KEYWORD_COUNT] = [
    entry("AS", Keyword::As, false),
    entry("BY", Keyword::By, true),
    entry("DO", Keyword::Do, false),
    entry("IF", Keyword::If, false),
    entry("IN", Keyword::In, false),
    entry("IS", Keyword::Is, false),
    entry("NO", Keyword::No, false),
    entry("OF", Keyword::Of, false),
    entry("ON", Keyword::On, false),
    entry("OR", Keyword::Or, true),
    entry("TO", Keyword::To, false),
    entry("ADD", Keyword::Add, false),
    entry("ALL", Keyword::All, true),
    entry("AND", Keyword::And, true),
    entry("ASC", Keyword::Asc, true),
    entry("END", Keyword::End, true),
    entry("FOR", Keyword::For, false),
    entry("GIN", Keyword::Gin, false),
    entry("INT", Keyword::Int, false),
    entry("KEY", Keyword::Key, true),
    entry("NOT", Keyword::Not, true),
    entry("ROW", Keyword::Row, false),
    entry("SET", Keyword::Set, false),
    entry("BLOB", Keyword::Blob, false),
    entry("BOOL", Keyword::Bool, false),
    entry("BRIN", Keyword::Brin, false),
    entry("CASE", Keyword::Case, true),
    entry("CAST", Keyword::Cast, false),
    entry("CHAR", Keyword::Char, false),
    entry("CUBE", Keyword::Cube, false),
    entry("DATA", Keyword::Data, false),
    entry("DATE", Keyword::Date, false),
    entry("DESC", Keyword::Desc, true),
    entry("DROP", Keyword::Drop, true),
    entry("EACH", Keyword::Each, false),
    entry("ELSE", Keyword::Else, true),
    entry("FROM", Keyword::From, true),
    entry("FULL", Keyword::Full, true),
    entry("GIST", Keyword::Gist, false),
    entry("HASH", Keyword::Hash, false),
    entry("INTO", Keyword::Into, false),
    entry("JOIN", Keyword::Join, true),
    entry("JSON", Keyword::Json, false),
    entry("LAST", Keyword::Last, false),
    entry("LEFT", Keyword::Left, true),
    entry("LIKE", Keyword::Like, false),
    entry("NEXT", Keyword::Next, false),
    entry("NULL", Keyword::Null, true),
    entry("ONLY", Keyword::Only, false),
    entry("OVER", Keyword::Over, false),
    entry("PLAN", Keyword::Plan, false),
    entry("READ", Keyword::Read, false),
    entry("REAL", Keyword::Real, false),
    entry("ROWS", Keyword::Rows, false),
    entry("SETS", Keyword::Sets, false),
    entry("TEMP", Keyword::Temp, false),
    entry("TEXT", Keyword::Text, false),
    entry("THEN", Keyword::Then, true),
    entry("TIES", Keyword::Ties, false),
    entry("TIME", Keyword::Time, false),
    entry("TRUE", Keyword::True, true),
    entry("TYPE", Keyword::Type, false),
    entry("VIEW", Keyword::View, true),
    entry("WHEN", Keyword::When, true),
    entry("WITH", Keyword::With, false),
    entry("WORK", Keyword::Work, false),
    entry("ZONE", Keyword::Zone, false),
    entry("AFTER", Keyword::After, false),
    entry("ALTER", Keyword::Alter, true),
    entry("ARRAY", Keyword::Array, false),
    entry("BEGIN", Keyword::Begin, true),
    entry("BTREE", Keyword::Btree, false),
    entry("BYTEA", Keyword::Bytea, false),
    entry("CACHE", Keyword::Cache, false),
    entry("CHAIN", Keyword::Chain, false),
    entry("CHECK", Keyword::Check, false),
    entry("CROSS", Keyword::Cross, true),
    entry("CYCLE", Keyword::Cycle, false),
    entry("DEPTH", Keyword::Depth, false),
    entry("FALSE", Keyword::False, true),
    entry("FETCH", Keyword::Fetch, false),
    entry("FIRST", Keyword::First, false),
    entry("FLOAT", Keyword::Float, false),
    entry("GROUP", Keyword::Group, true),
    entry("ILIKE", Keyword::Ilike, false),
    entry("INDEX", Keyword::Index, true),
    entry("INNER", Keyword::Inner, true),
    entry("JSONB", Keyword::Jsonb, false),
    entry("LEVEL", Keyword::Level, false),
    entry("LIMIT", Keyword::Limit, false),
    entry("LOCAL", Keyword::Local, false),
    entry("NULLS", Keyword::Nulls, false),
    entry("ORDER", Keyword::Order, true),
    entry("OUTER", Keyword::Outer, true),
    entry("OWNER", Keyword::Owner, false),
    entry("PIVOT", Keyword::Pivot, false),
    entry("QUERY", Keyword::Query, false),
    entry("RANGE", Keyword::Range, false),
    entry("RIGHT", Keyword::Right, true),
    entry("START", Keyword::Start, false),
    entry("TABLE", Keyword::Table, true),
    entry("UNION", Keyword::Union, true),
    entry("USING", Keyword::Using, false),
    entry("WHERE", Keyword::Where, true),
    entry("WRITE", Keyword::Write, false),
    entry("ACTION", Keyword::Action, false),
    entry("ALWAYS", Keyword::Always, false),
    entry("ATTACH", Keyword::Attach, false),
    entry("BEFORE", Keyword::Before, false),
    entry("BIGINT", Keyword::Bigint, false),
    entry("BINARY", Keyword::Binary, false),
    entry("COLUMN", Keyword::Column, false),
    entry("COMMIT", Keyword::Commit, true),
    entry("CREATE", Keyword::Create, true),
    entry("DELETE", Keyword::Delete, true),
    entry("DETACH", Keyword::Detach, false),
    entry("DOUBLE", Keyword::Double, false),
    entry("ESCAPE", Keyword::Escape, false),
    entry("EXCEPT", Keyword::Except, true),
    entry("EXISTS", Keyword::Exists, false),
    entry("FILTER", Keyword::Filter, false),
    entry("GROUPS", Keyword::Groups, false),
    entry("HAVING", Keyword::Having, true),
    entry("INSERT", Keyword::Insert, true),
    entry("OFFSET", Keyword::Offset, false),
    entry("OPTION", Keyword::Option, false),
    entry("OTHERS", Keyword::Others, false),
    entry("PRAGMA", Keyword::Pragma, false),
    entry("RENAME", Keyword::Rename, false),
    entry("ROLLUP", Keyword::Rollup, false),
    entry("SCHEMA", Keyword::Schema, false),
    entry("SEARCH", Keyword::Search, false),
    entry("SELECT", Keyword::Select, true),
    entry("SPGIST", Keyword::Spgist, false),
    entry("STORED", Keyword::Stored, false),
    entry("UNIQUE", Keyword::Unique, true),
    entry("UPDATE", Keyword::Update, true),
    entry("VACUUM", Keyword::Vacuum, false),
    entry("VALUES", Keyword::Values, false),
    entry("WINDOW", Keyword::Window, false),
    entry("WITHIN", Keyword::Within, false),
    entry("ANALYZE", Keyword::Analyze, false),
    entry("BETWEEN", Keyword::Between, false),
    entry("BOOLEAN", Keyword::Boolean, false),
    entry("BREADTH", Keyword::Breadth, false),
    entry("CASCADE", Keyword::Cascade, false),
    entry("COLLATE", Keyword::Collate, false),
    entry("CURRENT", Keyword::Current, false),
    entry("DECIMAL", Keyword::Decimal, false),
    entry("DEFAULT", Keyword::Default, false),
    entry("EXCLUDE", Keyword::Exclude, false),
    entry("EXPLAIN", Keyword::Explain, false),
    entry("EXTRACT", Keyword::Extract, false),
    entry("FOREIGN", Keyword::Foreign, true),
    entry("INSTEAD", Keyword::Instead, false),
    entry("INTEGER", Keyword::Integer, false),
    entry("LATERAL", Keyword::Lateral, false),
    entry("NATURAL", Keyword::Natural, false),
    entry("NOTHING", Keyword::Nothing, false),
    entry("NUMERIC", Keyword::Numeric, false),
    entry("PRIMARY", Keyword::Primary, true),
    entry("REINDEX", Keyword::Reindex, false),
    entry("RELEASE", Keyword::Release, false),
    entry("REPLACE", Keyword::Replace, false),
    entry("RESTART", Keyword::Restart, false),
    entry("SESSION", Keyword::Session, false),
    entry("TRIGGER", Keyword::Trigger, false),
    entry("UNPIVOT", Keyword::Unpivot, false),
    entry("VARCHAR", Keyword::Varchar, false),
    entry("VARYING", Keyword::Varying, false),
    entry("VIRTUAL", Keyword::Virtual, false),
    entry("CASCADED", Keyword::Cascaded, false),
    entry("CONFLICT", Keyword::Conflict, false),
    entry("DATABASE", Keyword::Database, false),
    entry("DISTINCT", Keyword::Distinct, true),
    entry("GROUPING", Keyword::Grouping, false),
    entry("INTERVAL", Keyword::Interval, false),
    entry("MAXVALUE", Keyword::Maxvalue, false),
    entry("MINVALUE", Keyword::Minvalue, false),
    entry("RESTRICT", Keyword::Restrict, false),
    entry("ROLLBACK", Keyword::Rollback, true),
    entry("SEQUENCE", Keyword::Sequence, false),
    entry("SMALLINT", Keyword::Smallint, false),
    entry("CHARACTER", Keyword::Character, false),
    entry("COMMITTED", Keyword::Committed, false),
    entry("FOLLOWING", Keyword::Following, false),
    entry("GENERATED", Keyword::Generated, false),
    entry("INCREMENT", Keyword::Increment, false),
    entry("INTERSECT", Keyword::Intersect, true),
    entry("ISOLATION", Keyword::Isolation, false),
    entry("PARTITION", Keyword::Partition, false),
    entry("PRECEDING", Keyword::Preceding, false),
    entry("PRECISION", Keyword::Precision, false),
    entry("RECURSIVE", Keyword::Recursive, false),
    entry("RETURNING", Keyword::Returning, false),
    entry("SAVEPOINT", Keyword::Savepoint, false),
    entry("STATEMENT", Keyword::Statement, false),
    entry("TEMPORARY", Keyword::Temporary, false),
    entry("TIMESTAMP", Keyword::Timestamp, false),
    entry("UNBOUNDED", Keyword::Unbounded, false),
    entry("CONSTRAINT", Keyword::Constraint, false),
    entry("DEFERRABLE", Keyword::Deferrable, false),
    entry("REFERENCES", Keyword::References, true),
    entry("REPEATABLE", Keyword::Repeatable, false),
    entry("TRANSACTION", Keyword::Transaction, true),
    entry("UNCOMMITTED", Keyword::Uncommitted, false),
    entry("SERIALIZABLE", Keyword::Serializable, false),
    entry("AUTHORIZATION", Keyword::Authorization, false),
];

/// A contiguous run of same-length entries within [`KEYWORDS`].
#[derive(Debug, Clone, Copy)]
pub struct LengthBucket {
    pub start: usize,
    pub count: usize,
}

/// Length-bucket index over [`KEYWORDS`], one bucket per length in use
/// (2 through 13). Bucket order follows table order.
pub static LENGTH_BUCKETS: [LengthBucket; LENGTH_BUCKET_COUNT] = [
    LengthBucket { start: 0, count: 11 },   // length 2
    LengthBucket { start: 11, count: 12 },  // length 3
    LengthBucket { start: 23, count: 44 },  // length 4
    LengthBucket { start: 67, count: 38 },  // length 5
    LengthBucket { start: 105, count: 36 }, // length 6
    LengthBucket { start: 141, count: 30 }, // length 7
    LengthBucket { start: 171, count: 12 }, // length 8
    LengthBucket { start: 183, count: 17 }, // length 9
    LengthBucket { start: 200, count: 4 },  // length 10
    LengthBucket { start: 204, count: 2 },  // length 11
    LengthBucket { start: 206, count: 1 },  // length 12
    LengthBucket { start: 207, count: 1 },  // length 13
];

/// Scalar keyword lookup: uppercase into a stack buffer, then binary
/// search the (length, text)-ordered table.
pub fn find_keyword(lexeme: &[u8]) -> Keyword {
    if lexeme.is_empty() || lexeme.len() > MAX_KEYWORD_LEN {
        return Keyword::Unknown;
    }

    let mut upper = [0u8; MAX_KEYWORD_LEN];
    for (dst, &src) in upper.iter_mut().zip(lexeme) {
        *dst = src.to_ascii_uppercase();
    }
    let upper = &upper[..lexeme.len()];

    KEYWORDS
        .binary_search_by(|e| {
            (e.length as usize)
                .cmp(&upper.len())
                .then_with(|| e.text.as_bytes().cmp(upper))
        })
        .map(|idx| KEYWORDS[idx].id)
        .unwrap_or(Keyword::Unknown)
}

/// SIMD keyword lookup: locate the length bucket, then run the dispatched
/// case-insensitive matcher over each candidate.
///
/// The probe receives exactly the lexeme bytes, so candidate comparisons
/// never touch memory past the lexeme.
pub fn find_keyword_simd(dispatcher: &Dispatcher, lexeme: &[u8]) -> Keyword {
    dispatcher.dispatch(KeywordProbe { lexeme })
}

struct KeywordProbe<'a> {
    lexeme: &'a [u8],
}

impl SimdOp for KeywordProbe<'_> {
    type Output = Keyword;

    fn run<P: SimdProcessor>(self, processor: P) -> Keyword {
        let len = self.lexeme.len();
        if len == 0 || len > MAX_KEYWORD_LEN {
            return Keyword::Unknown;
        }

        for bucket in &LENGTH_BUCKETS {
            let bucket_len = KEYWORDS[bucket.start].length as usize;
            if bucket_len == len {
                for entry in &KEYWORDS[bucket.start..bucket.start + bucket.count] {
                    if processor.matches_keyword(self.lexeme, entry.text.as_bytes()) {
                        return entry.id;
                    }
                }
                break;
            }
            if bucket_len > len {
                break;
            }
        }

        Keyword::Unknown
    }
}

/// Canonical uppercase spelling of a keyword id.
pub fn keyword_name(kw: Keyword) -> &'static str {
    match kw as u16 {
        0 => "UNKNOWN",
        id => KEYWORDS[(id - 1) as usize].text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_by_length_then_text() {
        for pair in KEYWORDS.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                (a.length, a.text) < (b.length, b.text),
                "{} must sort before {}",
                a.text,
                b.text
            );
        }
    }

    #[test]
    fn ids_are_positional() {
        for (idx, entry) in KEYWORDS.iter().enumerate() {
            assert_eq!(entry.id as u16 as usize, idx + 1, "{}", entry.text);
            assert_eq!(entry.length as usize, entry.text.len());
        }
    }

    #[test]
    fn buckets_align_with_table() {
        let mut covered = 0;
        for bucket in &LENGTH_BUCKETS {
            assert_eq!(bucket.start, covered, "buckets must tile the table");
            let len = KEYWORDS[bucket.start].length;
            for entry in &KEYWORDS[bucket.start..bucket.start + bucket.count] {
                assert_eq!(entry.length, len, "{} in wrong bucket", entry.text);
            }
            covered += bucket.count;
        }
        assert_eq!(covered, KEYWORDS.len());
    }

    #[test]
    fn hashes_match_generator_output() {
        // Spot values from the grammar generator artifact.
        assert_eq!(KEYWORDS[0].hash, 0x3dd53c4d); // AS
        assert_eq!(keyword_entry("SELECT").hash, 0xb4293aad);
        assert_eq!(keyword_entry("AUTHORIZATION").hash, 0xfa06895e);
    }

    #[test]
    fn scalar_lookup_is_case_insensitive() {
        assert_eq!(find_keyword(b"SELECT"), Keyword::Select);
        assert_eq!(find_keyword(b"select"), Keyword::Select);
        assert_eq!(find_keyword(b"SeLeCt"), Keyword::Select);
        assert_eq!(find_keyword(b"authorization"), Keyword::Authorization);
    }

    #[test]
    fn scalar_lookup_rejects_near_misses() {
        assert_eq!(find_keyword(b"SELECTS"), Keyword::Unknown);
        assert_eq!(find_keyword(b"FRO"), Keyword::Unknown);
        assert_eq!(find_keyword(b""), Keyword::Unknown);
        assert_eq!(find_keyword(b"_select"), Keyword::Unknown);
        assert_eq!(
            find_keyword(&[b'a'; MAX_KEYWORD_LEN + 1]),
            Keyword::Unknown
        );
    }

    #[test]
    fn simd_lookup_agrees_with_scalar() {
        let dispatcher = Dispatcher::new();
        for entry in &KEYWORDS {
            let upper = entry.text.as_bytes();
            let lower = entry.text.to_ascii_lowercase();
            assert_eq!(find_keyword_simd(&dispatcher, upper), entry.id);
            assert_eq!(find_keyword_simd(&dispatcher, lower.as_bytes()), entry.id);

            let mut extended = upper.to_vec();
            extended.push(b'x');
            assert_eq!(
                find_keyword_simd(&dispatcher, &extended),
                find_keyword(&extended),
                "paths disagree on {}x",
                entry.text
            );
        }
        assert_eq!(find_keyword_simd(&dispatcher, b""), Keyword::Unknown);
        assert_eq!(find_keyword_simd(&dispatcher, b"zz"), Keyword::Unknown);
    }

    #[test]
    fn reserved_flags() {
        assert!(Keyword::Select.is_reserved());
        assert!(Keyword::From.is_reserved());
        assert!(Keyword::Transaction.is_reserved());
        assert!(!Keyword::Owner.is_reserved());
        assert!(!Keyword::With.is_reserved());
        assert!(!Keyword::Unknown.is_reserved());
    }

    #[test]
    fn names_round_trip() {
        assert_eq!(keyword_name(Keyword::Unknown), "UNKNOWN");
        assert_eq!(keyword_name(Keyword::Select), "SELECT");
        assert_eq!(Keyword::Authorization.name(), "AUTHORIZATION");
        for entry in &KEYWORDS {
            assert_eq!(keyword_name(entry.id), entry.text);
        }
    }

    fn keyword_entry(text: &str) -> &'static KeywordEntry {
        KEYWORDS
            .iter()
            .find(|e| e.text == text)
            .expect("entry present")
    }
}
