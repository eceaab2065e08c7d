use crate::dom::{Dom, NodeId, class_tokens};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    StartsWith { key: String, value: String },
    EndsWith { key: String, value: String },
    Contains { key: String, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) universal: bool,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<AttrCondition>,
}

impl SelectorStep {
    pub(crate) fn id_only(&self) -> Option<&str> {
        if !self.universal && self.tag.is_none() && self.classes.is_empty() && self.attrs.is_empty()
        {
            self.id.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) step: SelectorStep,
    // Relation to the previous (left) part.
    pub(crate) combinator: Option<Combinator>,
}

pub(crate) fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    selector
        .split(',')
        .map(parse_selector_chain)
        .collect::<Result<Vec<_>>>()
}

pub(crate) fn parse_selector_chain(selector: &str) -> Result<Vec<SelectorPart>> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    let tokens = tokenize_selector(selector)?;
    let mut parts: Vec<SelectorPart> = Vec::new();
    let mut pending: Option<Combinator> = None;

    for token in tokens {
        if token == ">" {
            if pending.is_some() || parts.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            pending = Some(Combinator::Child);
            continue;
        }

        let step = parse_selector_step(&token, selector)?;
        let combinator = if parts.is_empty() {
            None
        } else {
            Some(pending.take().unwrap_or(Combinator::Descendant))
        };
        parts.push(SelectorPart { step, combinator });
    }

    if pending.is_some() || parts.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    Ok(parts)
}

fn tokenize_selector(selector: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_brackets = false;

    for ch in selector.chars() {
        match ch {
            '[' => {
                in_brackets = true;
                current.push(ch);
            }
            ']' => {
                if !in_brackets {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                in_brackets = false;
                current.push(ch);
            }
            '>' if !in_brackets => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(">".into());
            }
            ch if ch.is_whitespace() && !in_brackets => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            ch => current.push(ch),
        }
    }

    if in_brackets {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

fn parse_selector_step(token: &str, original: &str) -> Result<SelectorStep> {
    let mut step = SelectorStep::default();
    let mut chars = token.chars().peekable();

    let unsupported = || Error::UnsupportedSelector(original.to_string());

    // Leading tag name or universal selector.
    match chars.peek() {
        Some('*') => {
            step.universal = true;
            chars.next();
        }
        Some(ch) if ch.is_ascii_alphanumeric() => {
            let mut tag = String::new();
            while let Some(ch) = chars.peek() {
                if ch.is_ascii_alphanumeric() || *ch == '-' {
                    tag.push(*ch);
                    chars.next();
                } else {
                    break;
                }
            }
            step.tag = Some(tag.to_ascii_lowercase());
        }
        _ => {}
    }

    while let Some(ch) = chars.next() {
        match ch {
            '#' => {
                let name = read_name(&mut chars);
                if name.is_empty() {
                    return Err(unsupported());
                }
                step.id = Some(name);
            }
            '.' => {
                let name = read_name(&mut chars);
                if name.is_empty() {
                    return Err(unsupported());
                }
                step.classes.push(name);
            }
            '[' => {
                let mut body = String::new();
                let mut closed = false;
                for ch in chars.by_ref() {
                    if ch == ']' {
                        closed = true;
                        break;
                    }
                    body.push(ch);
                }
                if !closed {
                    return Err(unsupported());
                }
                step.attrs.push(parse_attr_condition(&body, original)?);
            }
            _ => return Err(unsupported()),
        }
    }

    if !step.universal
        && step.tag.is_none()
        && step.id.is_none()
        && step.classes.is_empty()
        && step.attrs.is_empty()
    {
        return Err(unsupported());
    }
    Ok(step)
}

fn read_name(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(ch) = chars.peek() {
        if ch.is_ascii_alphanumeric() || *ch == '-' || *ch == '_' {
            name.push(*ch);
            chars.next();
        } else {
            break;
        }
    }
    name
}

fn parse_attr_condition(body: &str, original: &str) -> Result<AttrCondition> {
    let unsupported = || Error::UnsupportedSelector(original.to_string());

    let Some(eq_at) = body.find('=') else {
        let key = body.trim();
        if key.is_empty() {
            return Err(unsupported());
        }
        return Ok(AttrCondition::Exists {
            key: key.to_ascii_lowercase(),
        });
    };

    let (raw_key, raw_value) = body.split_at(eq_at);
    let raw_value = &raw_value[1..];
    let value = raw_value
        .trim()
        .trim_matches(|ch| ch == '"' || ch == '\'')
        .to_string();

    let (key, kind) = match raw_key.trim() {
        key if key.ends_with('^') => (&key[..key.len() - 1], "^"),
        key if key.ends_with('$') => (&key[..key.len() - 1], "$"),
        key if key.ends_with('*') => (&key[..key.len() - 1], "*"),
        key => (key, "="),
    };
    let key = key.trim().to_ascii_lowercase();
    if key.is_empty() {
        return Err(unsupported());
    }

    Ok(match kind {
        "^" => AttrCondition::StartsWith { key, value },
        "$" => AttrCondition::EndsWith { key, value },
        "*" => AttrCondition::Contains { key, value },
        _ => AttrCondition::Eq { key, value },
    })
}

pub(crate) fn matches_step(dom: &Dom, node: NodeId, step: &SelectorStep) -> bool {
    let Some(element) = dom.element(node) else {
        return false;
    };

    if let Some(tag) = &step.tag {
        if !element.tag_name.eq_ignore_ascii_case(tag) {
            return false;
        }
    }

    if let Some(id) = &step.id {
        if element.attrs.get("id").map(String::as_str) != Some(id.as_str()) {
            return false;
        }
    }

    if !step.classes.is_empty() {
        let classes = class_tokens(element.attrs.get("class").map(String::as_str));
        if !step
            .classes
            .iter()
            .all(|wanted| classes.iter().any(|name| name == wanted))
        {
            return false;
        }
    }

    step.attrs.iter().all(|condition| match condition {
        AttrCondition::Exists { key } => element.attrs.contains_key(key),
        AttrCondition::Eq { key, value } => {
            element.attrs.get(key).map(String::as_str) == Some(value.as_str())
        }
        AttrCondition::StartsWith { key, value } => element
            .attrs
            .get(key)
            .is_some_and(|actual| actual.starts_with(value)),
        AttrCondition::EndsWith { key, value } => element
            .attrs
            .get(key)
            .is_some_and(|actual| actual.ends_with(value)),
        AttrCondition::Contains { key, value } => element
            .attrs
            .get(key)
            .is_some_and(|actual| actual.contains(value)),
    })
}

/// Matches a full chain against `node`, walking right-to-left through the
/// combinators the way a browser engine evaluates compound selectors.
pub(crate) fn matches_chain(dom: &Dom, node: NodeId, parts: &[SelectorPart]) -> bool {
    let Some((last, rest)) = parts.split_last() else {
        return false;
    };
    if !matches_step(dom, node, &last.step) {
        return false;
    }

    match last.combinator {
        None => true,
        Some(Combinator::Child) => dom
            .parent(node)
            .is_some_and(|parent| matches_chain(dom, parent, rest)),
        Some(Combinator::Descendant) => {
            let mut cursor = dom.parent(node);
            while let Some(ancestor) = cursor {
                if matches_chain(dom, ancestor, rest) {
                    return true;
                }
                cursor = dom.parent(ancestor);
            }
            false
        }
    }
}

impl Dom {
    pub(crate) fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    pub(crate) fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;

        if groups.len() == 1 && groups[0].len() == 1 {
            if let Some(id) = groups[0][0].step.id_only() {
                return Ok(self.by_id(id).into_iter().collect());
            }
        }

        let mut candidates = Vec::new();
        self.collect_elements_dfs(self.root, &mut candidates);

        let mut matched = Vec::new();
        for candidate in candidates {
            if groups
                .iter()
                .any(|parts| matches_chain(self, candidate, parts))
            {
                matched.push(candidate);
            }
        }
        Ok(matched)
    }

    pub(crate) fn query_selector_all_from(
        &self,
        root: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;

        let mut candidates = Vec::new();
        self.collect_element_descendants(root, &mut candidates);

        let mut matched = Vec::new();
        for candidate in candidates {
            if groups
                .iter()
                .any(|parts| matches_chain(self, candidate, parts))
            {
                matched.push(candidate);
            }
        }
        Ok(matched)
    }

    pub(crate) fn query_selector_from(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>> {
        Ok(self
            .query_selector_all_from(root, selector)?
            .into_iter()
            .next())
    }

    pub(crate) fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.element(current).is_some()
                && groups.iter().any(|parts| matches_chain(self, current, parts))
            {
                return Ok(Some(current));
            }
            cursor = self.parent(current);
        }
        Ok(None)
    }
}
