//! Fixed multilingual word lists (Uzbek, English, Russian).

pub const QUESTION_WORDS: &[&str] = &[
    "qanday", "nima", "qachon", "qayer", "kim", "nega", "nechta", "qaysi", "how", "what", "when",
    "where", "who", "why", "which", "how many",
];

/// Topic categories in declaration order; ties resolve to the earlier entry.
pub const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "salary",
        &["maosh", "oylik", "ish haqi", "salary", "payment", "pay", "pul"],
    ),
    (
        "vacation",
        &["ta'til", "dam olish", "vacation", "holiday", "отпуск"],
    ),
    (
        "sick_leave",
        &["kasallik", "bemor", "sick", "болен", "больничный"],
    ),
    ("contract", &["shartnoma", "kontrakt", "contract", "договор"]),
    (
        "document",
        &["hujjat", "dokument", "document", "справка", "документ"],
    ),
    (
        "schedule",
        &["jadval", "ish vaqti", "schedule", "working hours", "график"],
    ),
    (
        "resignation",
        &["ishdan ketish", "resign", "quit", "увольнение"],
    ),
    ("bonus", &["bonus", "mukofot", "премия", "reward"]),
    ("training", &["treining", "o'qitish", "training", "обучение"]),
    ("insurance", &["sug'urta", "insurance", "страховка"]),
];

pub const POSITIVE_WORDS: &[&str] = &[
    "yaxshi", "ajoyib", "zo'r", "rahmat", "good", "great", "thanks", "отлично", "спасибо",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "yomon", "muammo", "xato", "bad", "problem", "error", "issue", "плохо", "проблема",
];

pub const STOP_WORDS: &[&str] = &[
    "va", "yoki", "lekin", "and", "or", "but", "the", "is", "in", "to", "a", "of", "for", "на",
    "в", "и", "с", "по",
];
