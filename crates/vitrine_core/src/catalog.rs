use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::element::{
    generate_element_id, CtaButtonProps, Element, ElementProps, ElementStyle, ElementType,
    ImagePosition, ProductSectionProps, Spacing, SpecCategory, SpecItem, SpecsSectionProps,
};
use crate::error::BuilderError;

/// Palette group a component is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentCategory {
    Layout,
    Product,
    Content,
}

impl ComponentCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Layout => "Layout",
            Self::Product => "Seções do Produto",
            Self::Content => "Elementos Extras",
        }
    }

    pub fn all() -> [Self; 3] {
        [Self::Layout, Self::Product, Self::Content]
    }
}

/// Static description of a draggable block and the defaults a fresh instance
/// starts with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub label: String,
    pub icon: String,
    pub category: ComponentCategory,
    pub default_content: Option<String>,
    pub default_style: Option<ElementStyle>,
    pub default_props: Option<ElementProps>,
}

impl ComponentDefinition {
    /// Builds a new element from this definition's defaults. The defaults are
    /// cloned, so the returned element never aliases the catalog.
    pub fn instantiate(&self, parent_id: Option<String>) -> Element {
        Element {
            id: generate_element_id(),
            element_type: self.element_type.clone(),
            content: self.default_content.clone(),
            style: self.default_style.clone(),
            props: self.default_props.clone(),
            children: None,
            parent_id,
        }
    }
}

static DEFINITIONS: Lazy<Vec<ComponentDefinition>> = Lazy::new(|| {
    vec![
        ComponentDefinition {
            element_type: ElementType::ProductSection,
            label: "Seção do Produto".into(),
            icon: "fas fa-th-large".into(),
            category: ComponentCategory::Product,
            default_content: Some(String::new()),
            default_style: Some(ElementStyle {
                width: Some("100%".into()),
                background_color: Some("#1a1a1a".into()),
                border_radius: Some("12px".into()),
                padding: Some(Spacing::uniform(32)),
                margin: Some(Spacing::new(16, 0, 16, 0)),
                ..Default::default()
            }),
            default_props: Some(ElementProps::ProductSection(ProductSectionProps {
                title: "FAST IPS ALTA PERFORMANCE".into(),
                description: "Painel Fast IPS de 27\" oferece cores vibrantes e tempos de \
                              resposta ultrarrápidos. Com sRGB 120% e ângulo de visão de 178°, \
                              ideal para gamers que exigem precisão e qualidade visual \
                              excepcional."
                    .into(),
                image_url: "https://images.unsplash.com/photo-1527443224154-c4a3942d3acf?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&h=600".into(),
                image_position: ImagePosition::Left,
            })),
        },
        ComponentDefinition {
            element_type: ElementType::SpecsSection,
            label: "Especificações Técnicas".into(),
            icon: "fas fa-list".into(),
            category: ComponentCategory::Content,
            default_content: Some(String::new()),
            default_style: Some(ElementStyle {
                width: Some("100%".into()),
                background_color: Some("#ffffff".into()),
                padding: Some(Spacing::uniform(24)),
                margin: Some(Spacing::new(16, 0, 16, 0)),
                ..Default::default()
            }),
            default_props: Some(ElementProps::SpecsSection(SpecsSectionProps {
                title: "Especificações Técnicas".into(),
                specs: vec![
                    SpecCategory::new(
                        "Tela",
                        vec![
                            SpecItem::new("Tamanho", "27 polegadas"),
                            SpecItem::new("Tipo de painel", "Fast IPS"),
                            SpecItem::new("Resolução", "2560x1440 (QHD)"),
                            SpecItem::new("Taxa de atualização", "180Hz"),
                        ],
                    ),
                    SpecCategory::new(
                        "Conectividade",
                        vec![
                            SpecItem::new("HDMI", "2x HDMI 2.1"),
                            SpecItem::new("DisplayPort", "2x DisplayPort 1.4"),
                            SpecItem::new("USB", "2x USB 3.0"),
                        ],
                    ),
                ],
            })),
        },
        ComponentDefinition {
            element_type: ElementType::CtaButton,
            label: "Botão de Ação".into(),
            icon: "fas fa-external-link-alt".into(),
            category: ComponentCategory::Content,
            default_content: Some("Ver Mais Detalhes".into()),
            default_style: Some(ElementStyle {
                background_color: Some("#2563eb".into()),
                text_color: Some("#ffffff".into()),
                padding: Some(Spacing::new(16, 32, 16, 32)),
                border_radius: Some("8px".into()),
                font_size: Some("18px".into()),
                font_weight: Some("bold".into()),
                width: Some("auto".into()),
                margin: Some(Spacing::new(24, 0, 24, 0)),
                ..Default::default()
            }),
            default_props: Some(ElementProps::CtaButton(CtaButtonProps {
                link: Some("https://exemplo.com".into()),
                open_in_new_tab: true,
            })),
        },
    ]
});

/// All component definitions in palette order.
pub fn component_definitions() -> &'static [ComponentDefinition] {
    &DEFINITIONS
}

/// Looks up the definition for a type tag.
pub fn find_definition(element_type: &str) -> Option<&'static ComponentDefinition> {
    DEFINITIONS
        .iter()
        .find(|def| def.element_type.as_str() == element_type)
}

pub fn definitions_in_category(category: ComponentCategory) -> Vec<&'static ComponentDefinition> {
    DEFINITIONS
        .iter()
        .filter(|def| def.category == category)
        .collect()
}

/// Creates a fresh element of the given type with the catalog defaults.
///
/// Fails with [`BuilderError::UnknownElementType`] when no definition exists.
pub fn create_element(
    element_type: &str,
    parent_id: Option<String>,
) -> Result<Element, BuilderError> {
    let definition = find_definition(element_type)
        .ok_or_else(|| BuilderError::UnknownElementType(element_type.to_string()))?;
    let element = definition.instantiate(parent_id);
    debug!("Created {} element {}", element_type, element.id);
    Ok(element)
}
