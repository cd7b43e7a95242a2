use serde::{Deserialize, Serialize};

/// One row of the title lookup table: a substring of a Wikisource link title
/// and the USFM book code it resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookEntry {
    pub key: &'static str,
    pub code: &'static str,
}

const fn entry(key: &'static str, code: &'static str) -> BookEntry {
    BookEntry { key, code }
}

/// Title substrings in lookup order.
///
/// The first entry whose key occurs anywhere in a link title wins, so the
/// order of this slice is part of the matching behaviour. Several titles map
/// to the same code (e.g. the two spellings of the Corinthian epistles).
pub const BOOK_TABLE: &[BookEntry] = &[
    // Old Testament
    entry("Буття", "GEN"),
    entry("Вихід", "EXO"),
    entry("Левит", "LEV"),
    entry("Числа", "NUM"),
    entry("Повторення Закону", "DEU"),
    entry("Ісуса Навина", "JOS"),
    entry("Суддів", "JDG"),
    entry("Рут", "RUT"),
    entry("Перша книга Самуїлова", "1SA"),
    entry("Друга книга Самуїлова", "2SA"),
    entry("Перша книга царів", "1KI"),
    entry("Друга книга царів", "2KI"),
    entry("Перша книга хроніки", "1CH"),
    entry("Друга книга хроніки", "2CH"),
    entry("Ездри", "EZR"),
    entry("Неемії", "NEH"),
    entry("Естер", "EST"),
    entry("Йова", "JOB"),
    entry("Псалмів", "PSA"),
    entry("приказок Соломонових", "PRO"),
    entry("Екклезіястова", "ECC"),
    entry("Пісня над піснями", "SNG"),
    entry("Ісаї", "ISA"),
    entry("Єремії", "JER"),
    entry("Плач Єремії", "LAM"),
    entry("Єзекіїля", "EZK"),
    entry("Даниїла", "DAN"),
    entry("Осії", "HOS"),
    entry("Йоіла", "JOL"),
    entry("Амоса", "AMO"),
    entry("Овдія", "OBA"),
    entry("Йони", "JON"),
    entry("Михея", "MIC"),
    entry("Наума", "NAM"),
    entry("Авакума", "HAB"),
    entry("Софонії", "ZEP"),
    entry("Огія", "HAG"),
    entry("Захарія", "ZEC"),
    entry("Малахії", "MAL"),
    // New Testament
    entry("Матвія", "MAT"),
    entry("Марка", "MRK"),
    entry("Луки", "LUK"),
    entry("Івана", "JHN"),
    entry("Дії", "ACT"),
    entry("римлян", "ROM"),
    entry("1-е до коринтян", "1CO"),
    entry("2-е до коринтян", "2CO"),
    entry("Перше послання св. апостола Павла до коринтян", "1CO"),
    entry("Друге послання св. апостола Павла до коринтян", "2CO"),
    entry("галатів", "GAL"),
    entry("ефесян", "EPH"),
    entry("филип'ян", "PHP"),
    entry("колосян", "COL"),
    entry("Перше послання св. апостола Павла до солунян", "1TH"),
    entry("Друге послання св. апостола Павла до солунян", "2TH"),
    entry("Перше послання св. апостола Павла до Тимофія", "1TI"),
    entry("Друге послання св. апостола до Тимофія", "2TI"),
    entry("Тита", "TIT"),
    entry("Филимона", "PHM"),
    entry("євреїв", "HEB"),
    entry("Якова", "JAS"),
    entry("Перше соборне послання св. апостола Петра", "1PE"),
    entry("Друге соборне послання св. апостола Петра", "2PE"),
    entry("Перше соборне послання св. апостола Івана", "1JN"),
    entry("Друге соборне послання св. апостола Івана", "2JN"),
    entry("Третє соборне послання св. апостола Івана", "3JN"),
    entry("Юди", "JUD"),
    entry("Об'явлення", "REV"),
];

/// Resolve a link title to a book code by substring containment.
pub fn lookup_code(title: &str) -> Option<&'static str> {
    BOOK_TABLE
        .iter()
        .find(|e| title.contains(e.key))
        .map(|e| e.code)
}

/// Whether `code` appears anywhere in the lookup table.
pub fn is_known_code(code: &str) -> bool {
    BOOK_TABLE.iter().any(|e| e.code == code)
}

/// Distinct codes in first-appearance order.
pub fn known_codes() -> Vec<&'static str> {
    let mut codes: Vec<&'static str> = Vec::new();
    for e in BOOK_TABLE {
        if !codes.contains(&e.code) {
            codes.push(e.code);
        }
    }
    codes
}

/// A book link found on the index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedBook {
    /// USFM book code (e.g., "GEN", "1CO").
    pub code: String,
    /// Link text as shown on the index page.
    pub title: String,
    /// Absolute URL of the book page.
    pub url: String,
}
