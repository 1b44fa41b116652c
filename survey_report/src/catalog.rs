// ********* Question catalog **********

// The questions that can be explored interactively, and the demographic
// variables that can be used to break down the answers. The identifiers are
// those of the survey instrument, they do not need to match the column names
// of the data file exactly (see resolve_column).

use crate::NO_GROUPING;

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum QuestionType {
    Agreement,
    Adjectives,
    CourseSatisfaction,
    Discrimination,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Question {
    pub id: &'static str,
    pub wording: &'static str,
}

static AGREEMENT: [Question; 5] = [
    Question {
        id: "Q28_2",
        wording: "Professors care about me",
    },
    Question {
        id: "Q30_2",
        wording: "I feel like I'll be judged by my peers if I make a mistake",
    },
    Question {
        id: "Q32_6",
        wording: "I feel like an outsider",
    },
    Question {
        id: "Q33_1",
        wording: "I am satisfied with the social climate at my major's department",
    },
    Question {
        id: "Q33_4",
        wording: "I am treated fairly and equitably by staff in my major",
    },
];

static ADJECTIVES: [Question; 5] = [
    Question {
        id: "Q24_1",
        wording: "Hostile - Friendly",
    },
    Question {
        id: "Q24_3",
        wording: "Homogenous - Diverse",
    },
    Question {
        id: "Q24_7",
        wording: "Competitive - Collaborative",
    },
    Question {
        id: "Q24_12",
        wording: "Elitist - Non-elitist",
    },
    Question {
        id: "Q24_13",
        wording: "Individualistic - Collaborative",
    },
];

static COURSE_SATISFACTION: [Question; 5] = [
    Question {
        id: "Q11_1",
        wording: "CS111",
    },
    Question {
        id: "Q11_2",
        wording: "CS112",
    },
    Question {
        id: "Q11_3",
        wording: "CS131",
    },
    Question {
        id: "Q11_4",
        wording: "CS210",
    },
    Question {
        id: "Q11_5",
        wording: "CS330",
    },
];

static DISCRIMINATION: [Question; 2] = [
    Question {
        id: "Q36",
        wording: "Have you ever experienced discrimination...",
    },
    Question {
        id: "Q38",
        wording: "Have you ever witnessed discrimination...",
    },
];

impl QuestionType {
    /// In the order in which they are offered to the user.
    pub const ALL: [QuestionType; 4] = [
        QuestionType::Agreement,
        QuestionType::Adjectives,
        QuestionType::CourseSatisfaction,
        QuestionType::Discrimination,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::Agreement => "Agreement",
            QuestionType::Adjectives => "Adjectives",
            QuestionType::CourseSatisfaction => "Course Satisfaction",
            QuestionType::Discrimination => "Discrimination",
        }
    }

    /// Case is ignored.
    pub fn from_label(label: &str) -> Option<QuestionType> {
        QuestionType::ALL
            .iter()
            .find(|qt| qt.label().eq_ignore_ascii_case(label.trim()))
            .cloned()
    }

    pub fn questions(&self) -> &'static [Question] {
        match self {
            QuestionType::Agreement => &AGREEMENT,
            QuestionType::Adjectives => &ADJECTIVES,
            QuestionType::CourseSatisfaction => &COURSE_SATISFACTION,
            QuestionType::Discrimination => &DISCRIMINATION,
        }
    }

    pub fn question(&self, id: &str) -> Option<&'static Question> {
        self.questions().iter().find(|q| q.id == id)
    }

    /// Questions answered on a numeric scale, for which a distribution can be drawn.
    pub fn is_rating(&self) -> bool {
        matches!(self, QuestionType::Adjectives)
    }
}

/// The question identifiers for a type label. An unknown label has no questions.
pub fn questions(type_label: &str) -> Vec<&'static str> {
    QuestionType::from_label(type_label)
        .map(|qt| qt.questions().iter().map(|q| q.id).collect())
        .unwrap_or_default()
}

/// A variable that can be picked to break down the answers.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct VariableOption {
    pub label: &'static str,
    pub column: &'static str,
}

pub static VARIABLE_OPTIONS: [VariableOption; 8] = [
    VariableOption {
        label: "Gender",
        column: "gender",
    },
    VariableOption {
        label: "Race",
        column: "race",
    },
    VariableOption {
        label: "First Gen",
        column: "first_gen",
    },
    VariableOption {
        label: "International",
        column: "international",
    },
    VariableOption {
        label: "Major",
        column: "major",
    },
    VariableOption {
        label: "Preparedness",
        column: "prep",
    },
    VariableOption {
        label: "Work Status",
        column: "work_status",
    },
    VariableOption {
        label: "None",
        column: NO_GROUPING,
    },
];

/// The label offered when nothing is selected.
pub const NO_VARIABLE_LABEL: &str = "None";

/// The demographic sections of the survey report, in display order.
pub const REPORT_DEMOGRAPHICS: [&str; 5] = ["Gender", "Race", "First Gen", "Major", "International"];

/// The column token for a variable label. Case is ignored.
pub fn variable_column(label: &str) -> Option<&'static str> {
    VARIABLE_OPTIONS
        .iter()
        .find(|v| v.label.eq_ignore_ascii_case(label.trim()))
        .map(|v| v.column)
}

/// The grouping column for a variable label: None when the label is the "None" sentinel.
pub fn grouping_column(label: &str) -> Option<Option<&'static str>> {
    variable_column(label).map(|c| if c == NO_GROUPING { None } else { Some(c) })
}
