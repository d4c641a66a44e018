use serde_json::Value;

use crate::{error::Result, kind::PageKind, utils::params};

page_view!(Inventory, "inventory", |kind| kind == PageKind::Inventory);

impl Inventory {
    /// Render the inventory script output as an ini inventory
    pub async fn to_ini(&self) -> Result<String> {
        let script = self
            .get_related("script", &params([("hostvars", 1)]))
            .await?;
        Ok(render_ini(script.json()))
    }
}

fn render_ini(script: &Value) -> String {
    let mut out: Vec<String> = Vec::new();
    let Some(groups) = script.as_object() else {
        return String::new();
    };

    for (group, data) in groups {
        if group == "_meta" {
            continue;
        }

        out.push(format!("[{}]", group));
        for host in strings(data.get("hosts")) {
            out.push(host);
        }
        out.push(String::new());

        let children = strings(data.get("children"));
        if !children.is_empty() {
            out.push(format!("[{}:children]", group));
            out.extend(children);
            out.push(String::new());
        }

        if let Some(vars) = data.get("vars").and_then(Value::as_object).filter(|v| !v.is_empty()) {
            out.push(format!("[{}:vars]", group));
            for (k, v) in vars {
                match v {
                    Value::String(s) => out.push(format!("{}={}", k, s)),
                    other => out.push(format!("{}={}", k, other)),
                }
            }
            out.push(String::new());
        }
    }
    out.join("\n")
}

fn strings(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

page_view!(Group, "group", |kind| kind == PageKind::Group);

impl Group {
    /// Whether the group sits at the top of its inventory
    pub async fn is_root_group(&self) -> Result<bool> {
        let inventory = self.get_related("inventory", &[]).await?;
        let roots = inventory
            .get_related("root_groups", &params([("id", self.id()?)]))
            .await?;
        Ok(roots.count() == 1)
    }

    /// Ids of the groups holding this one as a child
    pub async fn parents(&self) -> Result<Vec<i64>> {
        let id = self.id()?;
        let inventory = self.get_related("inventory", &[]).await?;
        let candidates = inventory.get_related("groups", &[]).await?;

        let mut parents = Vec::new();
        for candidate in candidates.results() {
            let children = candidate
                .get_related("children", &params([("id", id)]))
                .await?;
            if children.count() > 0 {
                parents.push(candidate.id()?);
            }
        }
        Ok(parents)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_render_ini() {
        let script = json!({
            "_meta": {"hostvars": {"web1": {"ansible_host": "10.0.0.1"}}},
            "all": {"children": ["web"], "vars": {"ansible_user": "root", "port": 22}},
            "web": {"hosts": ["web1", "web2"]},
        });
        let expected = "[all]\n\n[all:children]\nweb\n\n[all:vars]\nansible_user=root\nport=22\n\n[web]\nweb1\nweb2\n";
        assert_eq!(render_ini(&script), expected);
    }

    #[test]
    fn test_render_ini_empty() {
        assert_eq!(render_ini(&json!({})), "");
        assert_eq!(render_ini(&json!([])), "");
    }
}
