//! The procedure tree: sequential steps and nested decision points.
//!
//! A [`Procedure`] is what the upstream analysis produces for one SOP
//! document. It is read-only input for the graph compiler; nothing in the
//! pipeline mutates it.
//!
//! ```
//! use sopflow_core::procedure::{Branch, Decision, Element, Procedure};
//!
//! let procedure = Procedure::new("Customer Support Triage")
//!     .with_element(Element::step("Receive customer support email"))
//!     .with_element(Element::decision(
//!         Decision::new("Is the issue billing-related?")
//!             .with_branch(Branch::new("Yes", vec![Element::step("Assign to Billing Queue")]))
//!             .with_branch(Branch::new("No", vec![Element::step("Assign to General Queue")])),
//!     ));
//!
//! assert_eq!(procedure.elements().len(), 2);
//! assert_eq!(procedure.decision_count(), 1);
//! ```

/// Root container for an analyzed procedure.
#[derive(Debug, Clone, PartialEq)]
pub struct Procedure {
    title: String,
    elements: Vec<Element>,
}

impl Procedure {
    /// Creates an empty procedure with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            elements: Vec::new(),
        }
    }

    /// Appends an element (builder style).
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Replaces all elements (builder style).
    pub fn with_elements(mut self, elements: Vec<Element>) -> Self {
        self.elements = elements;
        self
    }

    /// Title of the procedure, used to name the process.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Top-level elements in execution order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Number of decisions at any nesting depth.
    pub fn decision_count(&self) -> usize {
        count_decisions(&self.elements)
    }
}

fn count_decisions(elements: &[Element]) -> usize {
    elements
        .iter()
        .map(|element| match element {
            Element::Step { .. } => 0,
            Element::Decision(decision) => {
                1 + decision
                    .branches()
                    .iter()
                    .map(|branch| count_decisions(branch.steps()))
                    .sum::<usize>()
            }
        })
        .sum()
}

/// One entry of a procedure: either a plain step or a decision point.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Step { text: String },
    Decision(Decision),
}

impl Element {
    /// Creates a step element.
    pub fn step(text: impl Into<String>) -> Self {
        Self::Step { text: text.into() }
    }

    /// Wraps a decision into an element.
    pub fn decision(decision: Decision) -> Self {
        Self::Decision(decision)
    }
}

/// A decision point whose branches are mutually exclusive alternatives.
///
/// A decision without branches is legal and passes control straight through.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    question: String,
    branches: Vec<Branch>,
}

impl Decision {
    /// Creates a decision with no recorded branches.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            branches: Vec::new(),
        }
    }

    /// Appends a branch (builder style). Declaration order is preserved.
    pub fn with_branch(mut self, branch: Branch) -> Self {
        self.branches.push(branch);
        self
    }

    /// The question being evaluated at this decision.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Branches in declaration order.
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }
}

/// One labeled alternative out of a [`Decision`].
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    condition_label: String,
    steps: Vec<Element>,
}

impl Branch {
    /// Creates a branch. `steps` may be empty, and may contain nested decisions.
    pub fn new(condition_label: impl Into<String>, steps: Vec<Element>) -> Self {
        Self {
            condition_label: condition_label.into(),
            steps,
        }
    }

    /// Label of the condition selecting this branch, e.g. `Yes`.
    pub fn condition_label(&self) -> &str {
        &self.condition_label
    }

    /// Elements executed when this branch is taken.
    pub fn steps(&self) -> &[Element] {
        &self.steps
    }
}
