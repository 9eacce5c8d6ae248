use serde::{Deserialize, Serialize};

/// One instance-info field a connector expects in the `send_instance_info`
/// map: its key, an example value, and whether the host must supply it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceInfoField {
    pub name: String,
    pub example: String,
    pub required: bool,
}

impl InstanceInfoField {
    pub fn new(name: impl Into<String>, example: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            example: example.into(),
            required,
        }
    }
}

/// One file the host must hand to `initialize` by absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFileSpec {
    pub name: String,
    pub required: bool,
    pub description: String,
}

impl InputFileSpec {
    pub fn new(name: impl Into<String>, required: bool, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required,
            description: description.into(),
        }
    }
}

/// One string parameter the host must hand to `initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputParamSpec {
    pub name: String,
    pub required: bool,
    pub description: String,
}

impl InputParamSpec {
    pub fn new(name: impl Into<String>, required: bool, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required,
            description: description.into(),
        }
    }
}

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn tag(out: &mut String, name: &str, value: &str) {
    out.push('<');
    out.push_str(name);
    out.push('>');
    out.push_str(&escape(value));
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Renders instance-info field declarations as the markup document hosts
/// consume, records of name, example value and required flag.
pub fn instance_info_xml(fields: &[InstanceInfoField]) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str("<analyticinstanceinfo>");
    for field in fields {
        out.push_str("<info>");
        tag(&mut out, "name", &field.name);
        tag(&mut out, "value", &field.example);
        tag(&mut out, "required", if field.required { "true" } else { "false" });
        out.push_str("</info>");
    }
    out.push_str("</analyticinstanceinfo>");
    out
}

/// Renders input-file declarations as markup.
pub fn input_files_xml(files: &[InputFileSpec]) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str("<inputfiles>");
    for file in files {
        out.push_str("<inputfile>");
        tag(&mut out, "name", &file.name);
        tag(&mut out, "required", if file.required { "true" } else { "false" });
        tag(&mut out, "description", &file.description);
        out.push_str("</inputfile>");
    }
    out.push_str("</inputfiles>");
    out
}

/// Renders input-parameter declarations as markup.
pub fn input_params_xml(params: &[InputParamSpec]) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str("<inputparams>");
    for param in params {
        out.push_str("<inputparam>");
        tag(&mut out, "name", &param.name);
        tag(&mut out, "required", if param.required { "true" } else { "false" });
        tag(&mut out, "description", &param.description);
        out.push_str("</inputparam>");
    }
    out.push_str("</inputparams>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_info_renders_name_value_required() {
        let fields = vec![InstanceInfoField::new("Instance Id", "10", true)];
        let xml = instance_info_xml(&fields);
        assert!(xml.starts_with(XML_DECL));
        assert!(xml.contains(
            "<info><name>Instance Id</name><value>10</value><required>true</required></info>"
        ));
        assert!(xml.ends_with("</analyticinstanceinfo>"));
    }

    #[test]
    fn optional_entries_render_required_false() {
        let params = vec![InputParamSpec::new("Port number", false, "TCP port")];
        let xml = input_params_xml(&params);
        assert!(xml.contains("<required>false</required>"));
    }

    #[test]
    fn markup_metacharacters_are_escaped() {
        let files = vec![InputFileSpec::new("CA <bundle>", true, "certs & keys")];
        let xml = input_files_xml(&files);
        assert!(xml.contains("<name>CA &lt;bundle&gt;</name>"));
        assert!(xml.contains("certs &amp; keys"));
    }
}
