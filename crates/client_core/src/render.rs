//! Pure HTML rendering of a [`NodeForm`].
//!
//! The markup keeps the element ids and classes the config page has always
//! exposed (`nodes-container`, `add-node`, `remove-node`, `save-button`,
//! `execute-button`, and the per-node `node-box-{n}` containers), so the same
//! page scripts and selectors keep working against it.

use shared::domain::ControllerKind;

use crate::form::{ControllerSlot, NodeBox, NodeForm};

pub fn render_form_html(form: &NodeForm) -> String {
    let mut html = String::from("<div id=\"nodes-container\">\n");
    for node in form.nodes() {
        render_node_box(&mut html, node);
    }
    html.push_str("</div>\n");
    html.push_str("<button type=\"button\" id=\"add-node\">Add Node</button>\n");
    html.push_str("<button type=\"button\" id=\"remove-node\">Remove Node</button>\n");
    html.push_str("<button type=\"button\" id=\"save-button\">Save</button>\n");
    html.push_str("<button type=\"button\" id=\"execute-button\">Execute</button>\n");
    html
}

fn render_node_box(html: &mut String, node: &NodeBox) {
    let n = node.key().0;
    html.push_str(&format!("  <div class=\"node-box\" id=\"node-box-{n}\">\n"));
    html.push_str("    <label>Node ID:</label>\n");
    html.push_str(&format!(
        "    <input type=\"text\" class=\"node-id\" value=\"{}\" required>\n",
        escape(&node.node_id)
    ));
    html.push_str("    <label>Management IP:</label>\n");
    html.push_str(&format!(
        "    <input type=\"text\" class=\"management-ip\" value=\"{}\" required>\n",
        escape(&node.management_ip)
    ));
    html.push_str(&format!(
        "    <div id=\"pci-devices-container-{n}\" class=\"pci-devices-box\">\n"
    ));
    html.push_str("      <h3>PCI Devices</h3>\n");
    for kind in ControllerKind::ALL {
        render_controller_container(html, n, kind, node.controllers(kind));
    }
    html.push_str("    </div>\n");
    html.push_str("  </div>\n");
}

fn render_controller_container(
    html: &mut String,
    n: u64,
    kind: ControllerKind,
    slots: &[ControllerSlot],
) {
    let label = kind.label();
    let data = format!("data-node=\"{n}\" data-kind=\"{}\"", label.to_ascii_lowercase());
    html.push_str(&format!(
        "      <div id=\"{}-{n}\" class=\"pci-device-box\">\n",
        kind.container_id_prefix()
    ));
    html.push_str(&format!("        <label>{label} Controllers:</label>\n"));
    html.push_str(&format!(
        "        <button type=\"button\" class=\"add-controller\" {data}>+ Add {label} Controller</button>\n"
    ));
    html.push_str(&format!(
        "        <button type=\"button\" class=\"remove-controller\" {data}>- Remove {label} Controller</button>\n"
    ));
    for slot in slots {
        render_select(html, kind, slot);
    }
    html.push_str("      </div>\n");
}

fn render_select(html: &mut String, kind: ControllerKind, slot: &ControllerSlot) {
    let selection = slot.selection();
    html.push_str(&format!("        <select class=\"{}\">\n", kind.css_class()));
    html.push_str(&format!(
        "          <option value=\"\" disabled{}>{}</option>\n",
        selected_attr(selection.is_none()),
        kind.placeholder()
    ));
    for option in kind.catalog() {
        html.push_str(&format!(
            "          <option value=\"{}\"{}>{}</option>\n",
            option.value,
            selected_attr(selection == Some(option.value)),
            escape(option.label)
        ));
    }
    // Values restored from a saved config may be outside the catalog.
    if let Some(value) = selection.filter(|value| kind.find_option(value).is_none()) {
        let value = escape(value);
        html.push_str(&format!(
            "          <option value=\"{value}\" selected>{value}</option>\n"
        ));
    }
    html.push_str("        </select>\n");
}

fn selected_attr(selected: bool) -> &'static str {
    if selected {
        " selected"
    } else {
        ""
    }
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
