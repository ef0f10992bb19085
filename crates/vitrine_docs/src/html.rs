use vitrine_core::{Element, ElementType};

/// Base stylesheet embedded in every exported page. Product sections stack
/// vertically on narrow screens and switch to a row from 768px up.
const BASE_STYLESHEET: &str = r#"        body {
            font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
            margin: 0;
            padding: 20px;
            background-color: #f8fafc;
            line-height: 1.6;
        }
        .page-container {
            max-width: 1200px;
            margin: 0 auto;
            background-color: white;
            padding: 0;
            border-radius: 12px;
            box-shadow: 0 4px 6px rgba(0, 0, 0, 0.05);
            overflow: hidden;
        }

        /* Product Section Styles */
        .section-content {
            display: flex;
            flex-direction: column;
            align-items: center;
            gap: 1.5rem;
            padding: 2rem;
        }
        .image-container {
            width: 100%;
            max-width: 500px;
        }
        .product-image {
            width: 100%;
            height: auto;
            border-radius: 8px;
            object-fit: cover;
            max-height: 300px;
        }
        .content-container {
            width: 100%;
            text-align: center;
            color: white;
        }
        .section-title {
            font-size: 1.5rem;
            font-weight: bold;
            margin-bottom: 1rem;
            color: #3b82f6;
        }
        .section-description {
            font-size: 1rem;
            line-height: 1.6;
            color: #e5e7eb;
            max-width: 600px;
            margin: 0 auto;
        }

        /* Desktop Styles */
        @media (min-width: 768px) {
            .section-content {
                flex-direction: row;
                align-items: center;
                gap: 3rem;
                padding: 3rem;
            }
            .image-container {
                flex: 1;
                max-width: none;
            }
            .product-image {
                max-height: 400px;
            }
            .content-container {
                flex: 1;
                text-align: left;
            }
            .section-title {
                font-size: 2rem;
            }
            .section-description {
                font-size: 1.1rem;
                margin: 0;
            }
        }

        /* Mobile Adjustments */
        @media (max-width: 768px) {
            .page-container {
                margin: 10px;
                padding: 0;
            }
            body {
                padding: 10px;
            }
            .section-content {
                padding: 1.5rem;
            }
            .product-image {
                max-height: 250px;
            }
        }
"#;

/// Renders the elements, in order, into a complete standalone HTML page.
///
/// All text and attribute values taken from elements and the title are
/// HTML-escaped. Missing fields render as empty strings or sensible defaults;
/// this never fails.
pub fn export_to_html(elements: &[Element], title: &str) -> String {
    let body = elements
        .iter()
        .map(render_element)
        .collect::<Vec<_>>()
        .join("\n");

    let mut html = String::with_capacity(BASE_STYLESHEET.len() + body.len() + 512);
    html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str(&format!("    <title>{}</title>\n", escape_html(title)));
    html.push_str("    <style>\n");
    html.push_str(BASE_STYLESHEET);
    html.push_str("    </style>\n</head>\n<body>\n");
    html.push_str("    <div class=\"page-container\">\n");
    if !body.is_empty() {
        html.push_str(&body);
        html.push('\n');
    }
    html.push_str("    </div>\n</body>\n</html>\n");
    html
}

/// Renders one element as an HTML fragment.
pub fn render_element(element: &Element) -> String {
    match element.element_type {
        ElementType::ProductSection => render_product_section(element),
        ElementType::SpecsSection => render_specs_section(element),
        ElementType::CtaButton => render_cta_button(element),
        ElementType::Other(_) => render_generic(element),
    }
}

fn render_product_section(element: &Element) -> String {
    let props = element.product_props().cloned().unwrap_or_default();
    let title = escape_html(&props.title);

    format!(
        r#"        <div class="product-section" style="{style}">
            <div class="section-content">
                <div class="image-container">
                    <img src="{src}" alt="{title}" class="product-image" />
                </div>
                <div class="content-container">
                    <h2 class="section-title">{title}</h2>
                    <p class="section-description">{description}</p>
                </div>
            </div>
        </div>"#,
        style = escape_html(&element.inline_css()),
        src = escape_html(&props.image_url),
        title = title,
        description = escape_html(&props.description),
    )
}

fn render_specs_section(element: &Element) -> String {
    let props = element.specs_props().cloned().unwrap_or_default();

    let mut categories = String::new();
    for category in &props.specs {
        let mut rows = String::new();
        for item in &category.items {
            rows.push_str(&format!(
                r#"
                    <div style="display: flex; justify-content: space-between; padding: 0.5rem 0; border-bottom: 1px solid #f3f4f6;">
                        <span style="font-weight: 500; color: #374151;">{}</span>
                        <span style="color: #6b7280;">{}</span>
                    </div>"#,
                escape_html(&item.label),
                escape_html(&item.value),
            ));
        }
        categories.push_str(&format!(
            r#"
            <div style="margin-bottom: 2rem;">
                <h3 style="font-size: 1.25rem; font-weight: 600; margin-bottom: 1rem; color: #1f2937; border-bottom: 2px solid #e5e7eb; padding-bottom: 0.5rem;">{}</h3>
                <div style="display: grid; gap: 0.75rem;">{}
                </div>
            </div>"#,
            escape_html(&category.category),
            rows,
        ));
    }

    format!(
        r#"        <div class="specs-section" style="{style}">
            <h2 style="font-size: 1.5rem; font-weight: bold; margin-bottom: 1.5rem; color: #1f2937;">{title}</h2>{categories}
        </div>"#,
        style = escape_html(&with_extra_css(
            &element.inline_css(),
            "border: 1px solid #e5e7eb; border-radius: 8px",
        )),
        title = escape_html(&props.title),
        categories = categories,
    )
}

fn render_cta_button(element: &Element) -> String {
    let props = element.cta_props().cloned().unwrap_or_default();
    let href = props
        .link
        .as_deref()
        .filter(|link| !link.is_empty())
        .unwrap_or("#");
    let target = if props.open_in_new_tab {
        r#" target="_blank" rel="noopener noreferrer""#
    } else {
        ""
    };

    format!(
        r#"        <div style="text-align: center; margin: 2rem 0;">
            <a href="{href}"{target} style="{style}">{label}</a>
        </div>"#,
        href = escape_html(href),
        target = target,
        style = escape_html(&with_extra_css(
            &element.inline_css(),
            "display: inline-block; text-decoration: none; transition: transform 0.2s",
        )),
        label = escape_html(element.content.as_deref().unwrap_or_default()),
    )
}

fn render_generic(element: &Element) -> String {
    format!(
        r#"        <div class="content-block" style="{}">{}</div>"#,
        escape_html(&element.inline_css()),
        escape_html(element.content.as_deref().unwrap_or_default()),
    )
}

/// Appends fixed declarations after the element's own inline CSS.
fn with_extra_css(own: &str, extra: &str) -> String {
    if own.is_empty() {
        extra.to_string()
    } else {
        format!("{own}; {extra}")
    }
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::{
        create_element, CtaButtonProps, ElementProps, SpecCategory, SpecItem, SpecsSectionProps,
    };

    fn page_container_body(html: &str) -> &str {
        let start = html.find("<div class=\"page-container\">").unwrap()
            + "<div class=\"page-container\">".len();
        let end = html.rfind("</div>").unwrap();
        &html[start..end]
    }

    fn cta(link: Option<&str>, new_tab: bool, label: Option<&str>) -> Element {
        let mut el = Element::new("cta", ElementType::CtaButton).with_props(
            ElementProps::CtaButton(CtaButtonProps {
                link: link.map(str::to_string),
                open_in_new_tab: new_tab,
            }),
        );
        el.content = label.map(str::to_string);
        el
    }

    #[test]
    fn test_empty_document_structure() {
        let html = export_to_html(&[], "Empty");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Empty</title>"));
        assert!(html.contains("@media (min-width: 768px)"));
        assert!(html.contains("@media (max-width: 768px)"));
        assert!(html.trim_end().ends_with("</html>"));
        assert!(page_container_body(&html).trim().is_empty());
    }

    #[test]
    fn test_title_is_escaped() {
        let html = export_to_html(&[], "<script>alert('xss')</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_product_section_markup() {
        let el = create_element("product-section", None).unwrap();
        let html = render_element(&el);
        assert!(html.contains("class=\"product-section\""));
        assert!(html.contains("<h2 class=\"section-title\">FAST IPS ALTA PERFORMANCE</h2>"));
        assert!(html.contains("class=\"product-image\""));
        assert!(html.contains("background-color: #1a1a1a"));
        assert!(html.contains("padding-top: 32px"));
        assert!(html.contains("ixlib=rb-4.0.3&amp;auto=format"));
    }

    #[test]
    fn test_product_section_without_props_degrades() {
        let el = Element::new("p", ElementType::ProductSection);
        let html = render_element(&el);
        assert!(html.contains("<img src=\"\" alt=\"\""));
        assert!(html.contains("<h2 class=\"section-title\"></h2>"));
        assert!(html.contains("style=\"\""));
    }

    #[test]
    fn test_specs_preserve_order() {
        let el = Element::new("s", ElementType::SpecsSection).with_props(
            ElementProps::SpecsSection(SpecsSectionProps {
                title: "Ficha".into(),
                specs: vec![
                    SpecCategory::new("Tela", vec![SpecItem::new("Tamanho", "27\"")]),
                    SpecCategory::new("Portas", vec![SpecItem::new("HDMI", "2x 2.1")]),
                ],
            }),
        );
        let html = export_to_html(&[el], "Specs");

        let positions: Vec<usize> = ["Ficha", "Tela", "Tamanho", "27&quot;", "Portas", "HDMI", "2x 2.1"]
            .iter()
            .map(|needle| html.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
        assert_eq!(html.matches("<h3 ").count(), 2);
    }

    #[test]
    fn test_specs_without_props_renders_shell() {
        let html = render_element(&Element::new("s", ElementType::SpecsSection));
        assert!(html.contains("border: 1px solid #e5e7eb"));
        assert!(!html.contains("<h3"));
    }

    #[test]
    fn test_cta_new_tab_attributes() {
        let html = render_element(&cta(Some("https://exemplo.com"), true, Some("Comprar")));
        assert!(html.contains("href=\"https://exemplo.com\""));
        assert!(html.contains("target=\"_blank\" rel=\"noopener noreferrer\""));
        assert!(html.contains(">Comprar</a>"));
    }

    #[test]
    fn test_cta_same_tab_has_no_target() {
        let html = render_element(&cta(Some("https://exemplo.com"), false, Some("Comprar")));
        assert!(!html.contains("target="));
        assert!(!html.contains("noopener"));
    }

    #[test]
    fn test_cta_defaults() {
        let html = render_element(&cta(None, false, None));
        assert!(html.contains("href=\"#\""));
        assert!(html.contains("></a>"));

        let bare = render_element(&Element::new("c", ElementType::CtaButton));
        assert!(bare.contains("href=\"#\""));
        assert!(bare.contains("style=\"display: inline-block;"));
    }

    #[test]
    fn test_cta_style_then_fixed_css() {
        let el = create_element("cta-button", None).unwrap();
        let html = render_element(&el);
        assert!(html.contains(
            "style=\"font-size: 18px; font-weight: bold; color: #ffffff; \
             background-color: #2563eb; width: auto; border-radius: 8px; "
        ));
        assert!(html.contains("margin-bottom: 24px; display: inline-block;"));
    }

    #[test]
    fn test_unknown_type_renders_generic_block() {
        let el = Element::new("g", ElementType::Other("banner".into())).with_content("Promo <b>");
        let html = render_element(&el);
        assert!(html.contains("class=\"content-block\""));
        assert!(html.contains("Promo &lt;b&gt;"));
    }

    #[test]
    fn test_content_is_escaped() {
        let html = render_element(&cta(
            Some("javascript:\"x\""),
            false,
            Some("<img src=x onerror=alert(1)>"),
        ));
        assert!(!html.contains("<img src=x"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(html.contains("href=\"javascript:&quot;x&quot;\""));
    }

    #[test]
    fn test_export_is_deterministic() {
        let elements = vec![
            create_element("product-section", None).unwrap(),
            create_element("specs-section", None).unwrap(),
            create_element("cta-button", None).unwrap(),
        ];
        assert_eq!(
            export_to_html(&elements, "Monitor"),
            export_to_html(&elements, "Monitor")
        );
    }

    #[test]
    fn test_ids_do_not_leak_into_markup() {
        let el = create_element("product-section", None).unwrap();
        let html = export_to_html(std::slice::from_ref(&el), "x");
        assert!(!html.contains(&el.id));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("<'\">"), "&lt;&#39;&quot;&gt;");
    }
}
