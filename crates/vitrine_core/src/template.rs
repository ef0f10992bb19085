use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::element::{
    generate_element_id, CtaButtonProps, Element, ElementProps, ElementStyle, ElementType,
    ImagePosition, ProductSectionProps, Spacing, SpecCategory, SpecItem, SpecsSectionProps,
};

/// Product family a template targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Tech,
    Fashion,
    Home,
    Gaming,
    Electronics,
}

impl TemplateCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tech => "Tecnologia",
            Self::Fashion => "Moda",
            Self::Home => "Casa",
            Self::Gaming => "Gaming",
            Self::Electronics => "Eletrônicos",
        }
    }

    pub fn all() -> [Self; 5] {
        [
            Self::Tech,
            Self::Fashion,
            Self::Home,
            Self::Gaming,
            Self::Electronics,
        ]
    }
}

/// A named, read-only preset of page elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    /// Glyph shown on the template card.
    pub preview: String,
    pub elements: Vec<Element>,
}

/// Instantiates a template: clones every element and gives each copy a fresh
/// id. The template itself is never modified.
pub fn apply_template(template: &ProductTemplate) -> Vec<Element> {
    debug!(
        "Applying template {} ({} elements)",
        template.id,
        template.elements.len()
    );
    template
        .elements
        .iter()
        .map(|element| Element {
            id: generate_element_id(),
            ..element.clone()
        })
        .collect()
}

/// All built-in templates.
pub fn product_templates() -> &'static [ProductTemplate] {
    &TEMPLATES
}

pub fn find_template(id: &str) -> Option<&'static ProductTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

pub fn templates_in_category(category: TemplateCategory) -> Vec<&'static ProductTemplate> {
    TEMPLATES.iter().filter(|t| t.category == category).collect()
}

// ---------------------------------------------------------------------------
// Built-in presets
// ---------------------------------------------------------------------------

const SECTION_MARGIN: Spacing = Spacing {
    top: Some(16),
    right: Some(0),
    bottom: Some(16),
    left: Some(0),
};

fn product_section(
    id: &str,
    background: &str,
    title: &str,
    description: &str,
    image_url: &str,
    image_position: ImagePosition,
) -> Element {
    Element::new(id, ElementType::ProductSection)
        .with_style(ElementStyle {
            background_color: Some(background.into()),
            border_radius: Some("12px".into()),
            padding: Some(Spacing::uniform(32)),
            margin: Some(SECTION_MARGIN),
            ..Default::default()
        })
        .with_props(ElementProps::ProductSection(ProductSectionProps {
            title: title.into(),
            description: description.into(),
            image_url: image_url.into(),
            image_position,
        }))
}

fn specs_section(id: &str, specs: Vec<SpecCategory>) -> Element {
    Element::new(id, ElementType::SpecsSection)
        .with_style(ElementStyle {
            background_color: Some("#ffffff".into()),
            padding: Some(Spacing::uniform(24)),
            margin: Some(SECTION_MARGIN),
            ..Default::default()
        })
        .with_props(ElementProps::SpecsSection(SpecsSectionProps {
            title: "Especificações Técnicas".into(),
            specs,
        }))
}

fn cta_button(id: &str, label: &str, background: &str, link: &str) -> Element {
    Element::new(id, ElementType::CtaButton)
        .with_content(label)
        .with_style(ElementStyle {
            background_color: Some(background.into()),
            text_color: Some("#ffffff".into()),
            padding: Some(Spacing::new(16, 32, 16, 32)),
            border_radius: Some("8px".into()),
            font_size: Some("18px".into()),
            font_weight: Some("bold".into()),
            margin: Some(Spacing::new(24, 0, 24, 0)),
            ..Default::default()
        })
        .with_props(ElementProps::CtaButton(CtaButtonProps {
            link: Some(link.into()),
            open_in_new_tab: true,
        }))
}

fn category(name: &str, rows: &[(&str, &str)]) -> SpecCategory {
    SpecCategory::new(
        name,
        rows.iter()
            .map(|(label, value)| SpecItem::new(*label, *value))
            .collect(),
    )
}

fn unsplash(photo: &str) -> String {
    format!(
        "https://images.unsplash.com/photo-{photo}?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&h=600"
    )
}

static TEMPLATES: Lazy<Vec<ProductTemplate>> = Lazy::new(|| {
    vec![
        ProductTemplate {
            id: "gaming-monitor".into(),
            name: "Monitor Gamer".into(),
            description: "Template otimizado para monitores e periféricos gamer".into(),
            category: TemplateCategory::Gaming,
            preview: "🎮".into(),
            elements: vec![
                product_section(
                    "gaming-section-1",
                    "#1a1a1a",
                    "FAST IPS ALTA PERFORMANCE",
                    "Painel Fast IPS de 27\" oferece cores vibrantes e tempos de resposta \
                     ultrarrápidos. Com sRGB 120% e ângulo de visão de 178°, ideal para gamers \
                     que exigem precisão e qualidade visual excepcional.",
                    &unsplash("1527443224154-c4a3942d3acf"),
                    ImagePosition::Left,
                ),
                product_section(
                    "gaming-section-2",
                    "#1a1a1a",
                    "TAXA DE ATUALIZAÇÃO 180Hz",
                    "Taxa de atualização de 180Hz para jogabilidade ultra fluída. Experimente \
                     movimentos suaves e precisão timing em jogos competitivos.",
                    &unsplash("1606144042614-b2417e99c4e3"),
                    ImagePosition::Right,
                ),
                specs_section(
                    "gaming-specs",
                    vec![
                        category(
                            "Tela",
                            &[
                                ("Tamanho", "27 polegadas"),
                                ("Tipo de painel", "Fast IPS"),
                                ("Resolução", "2560x1440 (QHD)"),
                                ("Taxa de atualização", "180Hz"),
                                ("Tempo de resposta", "1ms (GtG)"),
                            ],
                        ),
                        category(
                            "Conectividade",
                            &[
                                ("HDMI", "2x HDMI 2.1"),
                                ("DisplayPort", "2x DisplayPort 1.4"),
                                ("USB", "2x USB 3.0"),
                                ("Áudio", "1x Saída de áudio"),
                            ],
                        ),
                    ],
                ),
                cta_button(
                    "gaming-cta",
                    "Ver Especificações Completas",
                    "#2563eb",
                    "https://exemplo.com/monitor-gamer",
                ),
            ],
        },
        ProductTemplate {
            id: "smartphone".into(),
            name: "Smartphone".into(),
            description: "Template para celulares e dispositivos móveis".into(),
            category: TemplateCategory::Electronics,
            preview: "📱".into(),
            elements: vec![
                product_section(
                    "phone-section-1",
                    "#f8fafc",
                    "CÂMERA PROFISSIONAL 108MP",
                    "Sistema de câmera tripla com sensor principal de 108MP, ultra-wide de 12MP \
                     e telefoto de 12MP. Capture fotos com qualidade profissional em qualquer \
                     condição de luz.",
                    &unsplash("1511707171634-5f897ff02aa9"),
                    ImagePosition::Left,
                ),
                specs_section(
                    "phone-specs",
                    vec![
                        category(
                            "Display",
                            &[
                                ("Tamanho", "6.7 polegadas"),
                                ("Tipo", "AMOLED"),
                                ("Resolução", "2400 x 1080"),
                                ("Taxa de atualização", "120Hz"),
                            ],
                        ),
                        category(
                            "Performance",
                            &[
                                ("Processador", "Snapdragon 8 Gen 2"),
                                ("RAM", "8GB / 12GB"),
                                ("Armazenamento", "256GB / 512GB"),
                            ],
                        ),
                    ],
                ),
                cta_button(
                    "phone-cta",
                    "Comprar Agora",
                    "#10b981",
                    "https://exemplo.com/smartphone",
                ),
            ],
        },
        ProductTemplate {
            id: "laptop".into(),
            name: "Laptop/Notebook".into(),
            description: "Template para laptops e notebooks".into(),
            category: TemplateCategory::Tech,
            preview: "💻".into(),
            elements: vec![
                product_section(
                    "laptop-section-1",
                    "#1e293b",
                    "PERFORMANCE PROFISSIONAL",
                    "Processador Intel Core i7 de 12ª geração combinado com 16GB de RAM DDR5 e \
                     SSD de 1TB. Ideal para trabalho, criação de conteúdo e multitarefas \
                     exigentes.",
                    &unsplash("1496181133206-80ce9b88a853"),
                    ImagePosition::Left,
                ),
                specs_section(
                    "laptop-specs",
                    vec![
                        category(
                            "Processamento",
                            &[
                                ("Processador", "Intel Core i7-1260P"),
                                ("Memória RAM", "16GB DDR5"),
                                ("Armazenamento", "1TB SSD NVMe"),
                                ("Placa de vídeo", "Intel Iris Xe"),
                            ],
                        ),
                        category(
                            "Display",
                            &[
                                ("Tamanho", "15.6 polegadas"),
                                ("Resolução", "1920x1080 Full HD"),
                                ("Tipo de painel", "IPS Anti-reflexo"),
                            ],
                        ),
                    ],
                ),
            ],
        },
        ProductTemplate {
            id: "headphone".into(),
            name: "Fone de Ouvido".into(),
            description: "Template para fones e equipamentos de áudio".into(),
            category: TemplateCategory::Electronics,
            preview: "🎧".into(),
            elements: vec![
                product_section(
                    "headphone-section-1",
                    "#0f172a",
                    "CANCELAMENTO DE RUÍDO ATIVO",
                    "Tecnologia ANC avançada que bloqueia ruídos externos para uma experiência \
                     de áudio imersiva. Ideal para viagens, trabalho e momentos de concentração.",
                    &unsplash("1583394838336-acd977736f90"),
                    ImagePosition::Right,
                ),
                specs_section(
                    "headphone-specs",
                    vec![
                        category(
                            "Áudio",
                            &[
                                ("Drivers", "40mm dinâmicos"),
                                ("Resposta de frequência", "20Hz - 20kHz"),
                                ("Impedância", "32 ohms"),
                                ("Cancelamento de ruído", "ANC Híbrido"),
                            ],
                        ),
                        category(
                            "Conectividade",
                            &[
                                ("Bluetooth", "5.3"),
                                ("Codecs", "SBC, AAC, LDAC"),
                                ("Autonomia", "30h com ANC"),
                            ],
                        ),
                    ],
                ),
            ],
        },
    ]
});
