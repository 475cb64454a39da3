use clap::ValueEnum;
use keyindex_keywords::KeywordScheme;

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum SchemeFlag {
    Identity,
    Retokenize,
}

impl SchemeFlag {
    pub(crate) const fn as_domain(self) -> KeywordScheme {
        match self {
            SchemeFlag::Identity => KeywordScheme::Identity,
            SchemeFlag::Retokenize => KeywordScheme::Retokenize,
        }
    }
}
