//! The detection ruleset: keyword lists, topic taxonomy and action-item
//! patterns the local analyzer runs on.
//!
//! Everything here is plain data. All phrases are lowercase, French, and
//! spelled without diacritics: transcription services are inconsistent
//! about accents, and `analyze` matches against a lowercased transcript
//! as-is. Matching is substring presence, so prefer phrases long enough
//! not to show up inside unrelated words.

use serde::Serialize;

/// Phrases signalling a cooperative exchange.
pub const COOPERATIVE_PHRASES: &[&str] = &[
    "merci",
    "d'accord",
    "parfait",
    "tres bien",
    "bien sur",
    "avec plaisir",
    "tout a fait",
    "je comprends",
    "pas de souci",
    "excellent",
];

/// Phrases signalling tension or concern.
pub const TENSE_PHRASES: &[&str] = &[
    "probleme",
    "inquiet",
    "difficile",
    "urgent",
    "retard",
    "pas possible",
    "malheureusement",
    "je conteste",
    "desaccord",
    "preoccupe",
];

/// Phrases signalling open hostility. Checked first: hostile outranks
/// tense, which outranks cooperative.
pub const HOSTILE_PHRASES: &[&str] = &[
    "inacceptable",
    "scandaleux",
    "hors de question",
    "n'importe quoi",
    "je refuse",
    "menace",
    "vous mentez",
    "insupportable",
    "ca suffit",
];

/// Minimum distinct phrase hits before a tone set wins over `neutral`.
pub const TONE_SIGNAL_THRESHOLD: usize = 2;

/// One practice-area category and the phrases that trigger it.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TopicRule {
    pub label: &'static str,
    pub triggers: &'static [&'static str],
}

/// Practice-area taxonomy. Iteration order here is the output order of
/// `topics`, so keep the common matters first.
pub const TOPIC_TAXONOMY: &[TopicRule] = &[
    TopicRule {
        label: "Droit du travail",
        triggers: &[
            "contrat de travail",
            "licenciement",
            "employeur",
            "salarie",
            "prud'hommes",
            "rupture conventionnelle",
            "periode d'essai",
        ],
    },
    TopicRule {
        label: "Droit immobilier",
        triggers: &[
            "bail",
            "loyer",
            "proprietaire",
            "locataire",
            "copropriete",
            "etat des lieux",
            "expulsion",
        ],
    },
    TopicRule {
        label: "Droit de la famille",
        triggers: &[
            "divorce",
            "pension alimentaire",
            "garde des enfants",
            "droit de visite",
            "separation",
            "mariage",
        ],
    },
    TopicRule {
        label: "Successions",
        triggers: &[
            "succession",
            "heritage",
            "testament",
            "notaire",
            "donation",
            "indivision",
        ],
    },
    TopicRule {
        label: "Droit des affaires",
        triggers: &[
            "societe",
            "associe",
            "statuts",
            "fonds de commerce",
            "contrat commercial",
            "facture impayee",
        ],
    },
    TopicRule {
        label: "Droit penal",
        triggers: &[
            "plainte",
            "garde a vue",
            "procureur",
            "infraction",
            "condamnation",
            "casier judiciaire",
        ],
    },
    TopicRule {
        label: "Procedure et contentieux",
        triggers: &[
            "tribunal",
            "audience",
            "assignation",
            "jugement",
            "mise en demeure",
            "huissier",
            "saisie",
        ],
    },
];

/// Label emitted when no taxonomy entry matches. `topics` is never empty.
pub const FALLBACK_TOPIC: &str = "Consultation generale";

/// One action-item extraction rule: a case-insensitive pattern matching a
/// sentence fragment from a trigger phrase up to the closing period.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ActionRule {
    pub name: &'static str,
    pub pattern: &'static str,
}

/// Extraction rules, applied in order. Matches keep their source wording;
/// only the first letter is capitalized.
pub const ACTION_RULES: &[ActionRule] = &[
    ActionRule {
        name: "obligation",
        pattern: r"(?i)\b(?:il faut|il faudra|vous devez|vous devrez|nous devons)[^.!?]*\.",
    },
    ActionRule {
        name: "engagement",
        pattern: r"(?i)\b(?:je vais|nous allons|on va|je m'engage a)[^.!?]*\.",
    },
    ActionRule {
        name: "verbe d'action",
        pattern: r"(?i)\b(?:envoyer|transmettre|rappeler|planifier|preparer|rediger|contacter|verifier)[^.!?]*\.",
    },
];

/// Role labels recognized as speaker markers, as a regex alternation.
/// Matched case-insensitively; the transcript's own casing is kept in the
/// output.
pub const SPEAKER_ROLE_PATTERN: &str = r"locuteur\s*\d+|avocat|client|interlocuteur";

/// Summary emitted when the transcript has no sentence long enough to
/// quote.
pub const SUMMARY_PLACEHOLDER: &str = "Transcription trop courte pour generer un resume.";
