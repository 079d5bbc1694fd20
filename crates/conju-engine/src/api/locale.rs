//! Interface languages and string tables.
//!
//! [`Locale`] is an explicit value owned by the session; nothing reads a
//! global language. Built-in tables cover the strings the engine itself
//! hands to the view layer (feedback, tray titles, tense names). Hosts can
//! merge richer tables, including grammar rules, with
//! [`Locale::merge_json`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Interface language. Also selects the puzzle translation/explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
    Zh,
    Ja,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::Fr, Language::En, Language::Zh, Language::Ja];

    pub fn code(self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
            Language::Zh => "zh",
            Language::Ja => "ja",
        }
    }

    /// Parse a language code; case-insensitive, region suffixes ignored ("en-GB").
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code.split(['-', '_']).next().unwrap_or_default().to_ascii_lowercase();
        Language::ALL.into_iter().find(|l| l.code() == primary)
    }
}

/// One entry of the grammar reference shown next to the board.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GrammarRule {
    pub title: String,
    pub formula: String,
    pub description: String,
    pub example: String,
    #[serde(default)]
    pub details: Vec<RuleDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleDetail {
    pub label: String,
    pub text: String,
    #[serde(default)]
    pub examples: Option<String>,
}

/// String tables of one language.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleTables {
    pub ui: BTreeMap<String, String>,
    pub tenses: BTreeMap<String, String>,
    pub rules: BTreeMap<String, GrammarRule>,
}

impl LocaleTables {
    fn from_pairs(ui: &[(&str, &str)], tenses: &[(&str, &str)]) -> Self {
        let own = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>()
        };
        Self {
            ui: own(ui),
            tenses: own(tenses),
            rules: BTreeMap::new(),
        }
    }

    fn merge(&mut self, other: LocaleTables) {
        self.ui.extend(other.ui);
        self.tenses.extend(other.tenses);
        self.rules.extend(other.rules);
    }
}

const FR_UI: &[(&str, &str)] = &[
    ("title", "ConjuPuzzle"),
    ("score", "Score"),
    ("check", "Vérifier"),
    ("skip", "Passer"),
    ("next", "Suivant"),
    ("loading", "Chargement..."),
    ("error_title", "Erreur"),
    ("error_desc", "Données inaccessibles."),
    ("retry", "Réessayer"),
    ("correct", "Correct ! Bien joué."),
    ("wrong", "Oups ! Essaie encore."),
    ("explanation", "Explication"),
    ("regular", "Régulier"),
    ("irregular", "Irrégulier"),
    ("lbl_aux", "Aux"),
    ("lbl_verb", "Verb"),
    ("lbl_aux_stem", "Aux · Base"),
    ("lbl_aux_ending", "Aux · Fin"),
    ("lbl_verb_stem", "Verbe · Base"),
    ("lbl_verb_ending", "Verbe · Fin"),
    ("milestone", "Incroyable ! {n} bonnes réponses !"),
];

const EN_UI: &[(&str, &str)] = &[
    ("title", "ConjuPuzzle"),
    ("score", "Score"),
    ("check", "Check"),
    ("skip", "Skip"),
    ("next", "Next"),
    ("loading", "Loading..."),
    ("error_title", "Error"),
    ("error_desc", "Data error."),
    ("retry", "Retry"),
    ("correct", "Correct!"),
    ("wrong", "Try again."),
    ("explanation", "Note"),
    ("regular", "Regular"),
    ("irregular", "Irregular"),
    ("lbl_aux", "Aux"),
    ("lbl_verb", "Verb"),
    ("lbl_aux_stem", "Aux · Base"),
    ("lbl_aux_ending", "Aux · Fin"),
    ("lbl_verb_stem", "Verb · Base"),
    ("lbl_verb_ending", "Verb · Fin"),
];

const ZH_UI: &[(&str, &str)] = &[
    ("score", "得分"),
    ("check", "检查"),
    ("skip", "跳过"),
    ("next", "下一题"),
    ("loading", "加载中..."),
    ("error_title", "错误"),
    ("error_desc", "加载失败"),
    ("retry", "重试"),
    ("correct", "正确！"),
    ("wrong", "再试一次"),
    ("explanation", "解析"),
    ("lbl_aux", "助动词"),
    ("lbl_verb", "动词"),
    ("lbl_aux_stem", "助动词 · 词根"),
    ("lbl_aux_ending", "助动词 · 词尾"),
    ("lbl_verb_stem", "动词 · 词根"),
    ("lbl_verb_ending", "动词 · 词尾"),
    ("milestone", "太棒了！已答对 {n} 题！"),
];

const JA_UI: &[(&str, &str)] = &[
    ("score", "点数"),
    ("check", "判定"),
    ("skip", "パス"),
    ("next", "次へ"),
    ("loading", "読込中..."),
    ("error_title", "エラー"),
    ("error_desc", "通信エラー"),
    ("retry", "再試行"),
    ("correct", "正解！"),
    ("wrong", "不正解"),
    ("explanation", "解説"),
    ("lbl_aux", "助動詞"),
    ("lbl_verb", "動詞"),
    ("lbl_aux_stem", "助動詞 · 語幹"),
    ("lbl_aux_ending", "助動詞 · 語尾"),
    ("lbl_verb_stem", "動詞 · 語幹"),
    ("lbl_verb_ending", "動詞 · 語尾"),
    ("milestone", "すごい！正解数: {n}！"),
];

const FR_TENSES: &[(&str, &str)] = &[("Subjonctif Plus-que-parfait", "Subjonctif P.Q.P.")];

const EN_TENSES: &[(&str, &str)] = &[
    ("Présent", "Present"),
    ("Imparfait", "Imperfect"),
    ("Futur Simple", "Future"),
    ("Passé Simple", "Past Historic"),
    ("Conditionnel Présent", "Conditional"),
    ("Subjonctif Présent", "Subjunctive"),
    ("Subjonctif Imparfait", "Subj. Imperfect"),
    ("Passé Composé", "Compound Past"),
    ("Plus-que-parfait", "Pluperfect"),
    ("Futur Antérieur", "Future Perfect"),
    ("Passé Antérieur", "Past Anterior"),
    ("Conditionnel Passé", "Conditional Past"),
    ("Subjonctif Passé", "Subj. Past"),
    ("Subjonctif Plus-que-parfait", "Subj. Pluperfect"),
];

const ZH_TENSES: &[(&str, &str)] = &[
    ("Présent", "直陈式现在时"),
    ("Imparfait", "未完成过去时"),
    ("Futur Simple", "简单将来时"),
    ("Passé Simple", "简单过去时"),
    ("Conditionnel Présent", "条件式现在时"),
    ("Subjonctif Présent", "虚拟式现在时"),
    ("Subjonctif Imparfait", "虚拟式未完成"),
    ("Passé Composé", "复合过去时"),
    ("Plus-que-parfait", "愈过去时"),
    ("Futur Antérieur", "先将来时"),
    ("Passé Antérieur", "先过去时"),
    ("Conditionnel Passé", "条件式过去时"),
    ("Subjonctif Passé", "虚拟式过去时"),
    ("Subjonctif Plus-que-parfait", "虚拟式愈过去"),
];

const JA_TENSES: &[(&str, &str)] = &[
    ("Présent", "現在形"),
    ("Imparfait", "半過去"),
    ("Futur Simple", "単純未来"),
    ("Passé Simple", "単純過去"),
    ("Conditionnel Présent", "条件法現在"),
    ("Subjonctif Présent", "接続法現在"),
    ("Subjonctif Imparfait", "接続法半過去"),
    ("Passé Composé", "複合過去"),
    ("Plus-que-parfait", "大過去"),
    ("Futur Antérieur", "前未来"),
    ("Passé Antérieur", "前過去"),
    ("Conditionnel Passé", "条件法過去"),
    ("Subjonctif Passé", "接続法過去"),
    ("Subjonctif Plus-que-parfait", "接続法大過去"),
];

/// Active language plus the string tables of every language.
#[derive(Debug, Clone)]
pub struct Locale {
    language: Language,
    tables: BTreeMap<Language, LocaleTables>,
}

impl Default for Locale {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl Locale {
    pub fn new(language: Language) -> Self {
        let tables = [
            (Language::Fr, LocaleTables::from_pairs(FR_UI, FR_TENSES)),
            (Language::En, LocaleTables::from_pairs(EN_UI, EN_TENSES)),
            (Language::Zh, LocaleTables::from_pairs(ZH_UI, ZH_TENSES)),
            (Language::Ja, LocaleTables::from_pairs(JA_UI, JA_TENSES)),
        ]
        .into_iter()
        .collect();
        Self { language, tables }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Merge tables for `language` over the built-in ones.
    pub fn merge(&mut self, language: Language, tables: LocaleTables) {
        self.tables.entry(language).or_default().merge(tables);
    }

    /// Merge a JSON object keyed by language code (`{"fr": {"ui": {...}}}`).
    /// Unknown language codes are skipped.
    pub fn merge_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        let parsed: BTreeMap<String, LocaleTables> = serde_json::from_str(json)?;
        for (code, tables) in parsed {
            match Language::from_code(&code) {
                Some(language) => self.merge(language, tables),
                None => log::warn!("ignoring locale tables for unknown language `{}`", code),
            }
        }
        Ok(())
    }

    fn table(&self, language: Language) -> Option<&LocaleTables> {
        self.tables.get(&language)
    }

    /// UI string for `key`; falls back to French, then to the key itself.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        [self.language, Language::Fr]
            .into_iter()
            .filter_map(|l| self.table(l)?.ui.get(key))
            .next()
            .map(String::as_str)
            .unwrap_or(key)
    }

    /// Display name of a tense id; falls back to the id.
    pub fn tense<'a>(&'a self, id: &'a str) -> &'a str {
        self.table(self.language)
            .and_then(|t| t.tenses.get(id))
            .map(String::as_str)
            .unwrap_or(id)
    }

    /// Grammar rule for a tense id in the active language, if any.
    pub fn rule(&self, id: &str) -> Option<&GrammarRule> {
        self.table(self.language)?.rules.get(id)
    }

    /// The milestone banner with the success count substituted.
    pub fn milestone(&self, count: u32) -> String {
        self.t("milestone").replace("{n}", &count.to_string())
    }
}
