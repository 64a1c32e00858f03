//! Placement rules for dropped elements.
//!
//! The engine will put any element into any box. Which kinds are allowed
//! where is a product decision, checked here before an insert is
//! dispatched.
//!
//! ## Learning: Trait Objects
//!
//! `dyn PlacementRule` allows storing different rule types in the same
//! collection. The built-in rules are plain unit structs; callers can
//! register their own next to them.

use cardsmith_model::{BoxLayout, Component, Element, ElementType, SectionKind};

/// Why a drop was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementViolation {
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Drop target not found: {0}")]
    TargetNotFound(String),

    #[error("A {kind} cannot be placed inside {target}, which is not a box")]
    NotAContainer { target: String, kind: ElementType },

    #[error("Buttons cannot be placed in a baseline box")]
    ButtonInBaseline,

    #[error("Buttons must be placed inside a box")]
    ButtonOutsideBox,

    #[error("Icons can only be placed in a baseline box")]
    IconOutsideBaseline,

    #[error("Videos can only be placed in the hero section")]
    VideoOutsideHero,

    #[error("{rule}: {reason}")]
    Rejected { rule: String, reason: String },
}

/// Where an element is about to land.
#[derive(Debug, Clone, Copy)]
pub struct DropContext<'a> {
    /// Slot of the section being dropped into
    pub section: SectionKind,
    /// Receiving box, or `None` for the section root
    pub target: Option<&'a Element>,
    /// Kind of the element being dropped
    pub kind: ElementType,
}

impl DropContext<'_> {
    /// Layout of the receiving box, if dropping into one.
    pub fn target_layout(&self) -> Option<BoxLayout> {
        self.target.and_then(Element::layout)
    }
}

/// A single placement rule.
pub trait PlacementRule: Send + Sync {
    /// Returns the rule name.
    fn name(&self) -> &str;

    /// Checks a drop. Rules that don't care about `ctx.kind` return `Ok`.
    fn check(&self, ctx: &DropContext<'_>) -> Result<(), PlacementViolation>;
}

/// Buttons only sit in a vertical or horizontal box, never at a section
/// root or in a baseline row.
struct ButtonRule;

impl PlacementRule for ButtonRule {
    fn name(&self) -> &str {
        "button"
    }

    fn check(&self, ctx: &DropContext<'_>) -> Result<(), PlacementViolation> {
        if ctx.kind != ElementType::Button {
            return Ok(());
        }
        match ctx.target_layout() {
            None => Err(PlacementViolation::ButtonOutsideBox),
            Some(BoxLayout::Baseline) => Err(PlacementViolation::ButtonInBaseline),
            Some(_) => Ok(()),
        }
    }
}

/// Icons only sit in a baseline row, never at a section root.
struct IconRule;

impl PlacementRule for IconRule {
    fn name(&self) -> &str {
        "icon"
    }

    fn check(&self, ctx: &DropContext<'_>) -> Result<(), PlacementViolation> {
        if ctx.kind == ElementType::Icon && ctx.target_layout() != Some(BoxLayout::Baseline) {
            return Err(PlacementViolation::IconOutsideBaseline);
        }
        Ok(())
    }
}

/// Videos only go in the hero.
struct VideoRule;

impl PlacementRule for VideoRule {
    fn name(&self) -> &str {
        "video"
    }

    fn check(&self, ctx: &DropContext<'_>) -> Result<(), PlacementViolation> {
        if ctx.kind == ElementType::Video && ctx.section != SectionKind::Hero {
            return Err(PlacementViolation::VideoOutsideHero);
        }
        Ok(())
    }
}

/// Ordered set of placement rules.
pub struct PlacementPolicy {
    rules: Vec<Box<dyn PlacementRule>>,
}

impl PlacementPolicy {
    /// Creates a policy with the built-in rules.
    pub fn new() -> Self {
        let mut policy = Self::empty();
        policy.register(Box::new(ButtonRule));
        policy.register(Box::new(IconRule));
        policy.register(Box::new(VideoRule));
        policy
    }

    /// Creates a policy with no kind rules; only structure is checked.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Registers a rule, replacing any rule with the same name.
    pub fn register(&mut self, rule: Box<dyn PlacementRule>) {
        let name = rule.name().to_string();
        self.rules.retain(|existing| existing.name() != name);
        self.rules.push(rule);
    }

    /// Returns all registered rule names, in evaluation order.
    pub fn list(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Checks whether an element of `kind` may be dropped into
    /// `target_id` (or the section root) of `section_id`.
    ///
    /// The target must exist in that section and be a box; then every
    /// rule runs in order and the first violation wins.
    pub fn check(
        &self,
        component: &Component,
        section_id: &str,
        target_id: Option<&str>,
        kind: ElementType,
    ) -> Result<(), PlacementViolation> {
        let (section_kind, section) = component
            .section_by_id(section_id)
            .ok_or_else(|| PlacementViolation::SectionNotFound(section_id.to_string()))?;

        let target = match target_id {
            Some(id) => {
                let target = section
                    .find(id)
                    .ok_or_else(|| PlacementViolation::TargetNotFound(id.to_string()))?;
                if !target.is_container() {
                    return Err(PlacementViolation::NotAContainer {
                        target: id.to_string(),
                        kind,
                    });
                }
                Some(target)
            }
            None => None,
        };

        let ctx = DropContext {
            section: section_kind,
            target,
            kind,
        };
        self.rules.iter().try_for_each(|rule| rule.check(&ctx))
    }
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardsmith_model::{
        INITIAL_BODY_ID, INITIAL_BOX_ID, INITIAL_FOOTER_ID, INITIAL_HERO_ID, Section,
    };

    /// Seed card with a baseline row and a text leaf inside `initial_box`.
    fn card() -> Component {
        let body = Section::new(INITIAL_BODY_ID).with_element(
            Component::seed_box()
                .with_child(Element::container("row", BoxLayout::Baseline))
                .with_child(Element::text("t1", "hi")),
        );
        Component::default().with_section(SectionKind::Body, body)
    }

    #[test]
    fn test_builtin_rules() {
        assert_eq!(PlacementPolicy::new().list(), vec!["button", "icon", "video"]);
    }

    #[test]
    fn test_text_anywhere() {
        let policy = PlacementPolicy::new();
        let card = card();
        assert!(policy.check(&card, INITIAL_BODY_ID, Some(INITIAL_BOX_ID), ElementType::Text).is_ok());
        assert!(policy.check(&card, INITIAL_BODY_ID, Some("row"), ElementType::Text).is_ok());
        assert!(policy.check(&card, INITIAL_FOOTER_ID, None, ElementType::Text).is_ok());
    }

    #[test]
    fn test_button_not_in_baseline() {
        let policy = PlacementPolicy::new();
        let card = card();
        assert_eq!(
            policy.check(&card, INITIAL_BODY_ID, Some("row"), ElementType::Button),
            Err(PlacementViolation::ButtonInBaseline)
        );
        assert!(policy.check(&card, INITIAL_BODY_ID, Some(INITIAL_BOX_ID), ElementType::Button).is_ok());
    }

    #[test]
    fn test_button_needs_a_box() {
        let policy = PlacementPolicy::new();
        let card = card();
        assert_eq!(
            policy.check(&card, INITIAL_BODY_ID, None, ElementType::Button),
            Err(PlacementViolation::ButtonOutsideBox)
        );
        assert_eq!(
            policy.check(&card, INITIAL_FOOTER_ID, None, ElementType::Button),
            Err(PlacementViolation::ButtonOutsideBox)
        );
    }

    #[test]
    fn test_icon_only_in_baseline() {
        let policy = PlacementPolicy::new();
        let card = card();
        assert!(policy.check(&card, INITIAL_BODY_ID, Some("row"), ElementType::Icon).is_ok());
        assert_eq!(
            policy.check(&card, INITIAL_BODY_ID, Some(INITIAL_BOX_ID), ElementType::Icon),
            Err(PlacementViolation::IconOutsideBaseline)
        );
        assert_eq!(
            policy.check(&card, INITIAL_BODY_ID, None, ElementType::Icon),
            Err(PlacementViolation::IconOutsideBaseline)
        );
    }

    #[test]
    fn test_video_only_in_hero() {
        let policy = PlacementPolicy::new();
        let card = card();
        assert!(policy.check(&card, INITIAL_HERO_ID, None, ElementType::Video).is_ok());
        assert_eq!(
            policy.check(&card, INITIAL_BODY_ID, Some(INITIAL_BOX_ID), ElementType::Video),
            Err(PlacementViolation::VideoOutsideHero)
        );
    }

    #[test]
    fn test_structural_checks() {
        let policy = PlacementPolicy::empty();
        let card = card();
        assert_eq!(
            policy.check(&card, "nope", None, ElementType::Text),
            Err(PlacementViolation::SectionNotFound("nope".into()))
        );
        assert_eq!(
            policy.check(&card, INITIAL_BODY_ID, Some("ghost"), ElementType::Text),
            Err(PlacementViolation::TargetNotFound("ghost".into()))
        );
        assert_eq!(
            policy.check(&card, INITIAL_BODY_ID, Some("t1"), ElementType::Text),
            Err(PlacementViolation::NotAContainer {
                target: "t1".into(),
                kind: ElementType::Text
            })
        );
        // The box lives in body, not in the footer
        assert!(matches!(
            policy.check(&card, INITIAL_FOOTER_ID, Some(INITIAL_BOX_ID), ElementType::Text),
            Err(PlacementViolation::TargetNotFound(_))
        ));
    }

    #[test]
    fn test_custom_rule() {
        struct NoImagesInFooter;

        impl PlacementRule for NoImagesInFooter {
            fn name(&self) -> &str {
                "footer-images"
            }

            fn check(&self, ctx: &DropContext<'_>) -> Result<(), PlacementViolation> {
                if ctx.kind == ElementType::Image && ctx.section == SectionKind::Footer {
                    return Err(PlacementViolation::Rejected {
                        rule: self.name().into(),
                        reason: "footer is text only".into(),
                    });
                }
                Ok(())
            }
        }

        let mut policy = PlacementPolicy::new();
        policy.register(Box::new(NoImagesInFooter));

        let err = policy
            .check(&card(), INITIAL_FOOTER_ID, None, ElementType::Image)
            .unwrap_err();
        assert_eq!(err.to_string(), "footer-images: footer is text only");
    }
}
