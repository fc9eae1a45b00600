//! Hydrating a component over server-rendered markup.

use spark_hydrate::{
    append_hydration, claim_element, claim_space, claim_text, dom, init, insert_hydration, Component,
    ComponentDefinition, ComponentOptions, DirtyMask, Document, Fragment, FragmentError, Host, NodeId,
    NodeList, Props, Scheduler, Value,
};

/// `<h1 class="..">{title}</h1> <p>{body}</p>`
struct Card {
    title: String,
    tone: String,
    body: String,
    h1: Option<NodeId>,
    title_text: Option<NodeId>,
    gap: Option<NodeId>,
    p: Option<NodeId>,
    body_text: Option<NodeId>,
}

impl Card {
    fn new(ctx: &[Value]) -> Self {
        Self {
            title: ctx[0].to_text(),
            tone: ctx[1].to_text(),
            body: ctx[2].to_text(),
            h1: None,
            title_text: None,
            gap: None,
            p: None,
            body_text: None,
        }
    }

    fn nodes(&self) -> Result<[NodeId; 5], FragmentError> {
        match (self.h1, self.title_text, self.gap, self.p, self.body_text) {
            (Some(h1), Some(title), Some(gap), Some(p), Some(body)) => Ok([h1, title, gap, p, body]),
            _ => Err(FragmentError::msg("card mounted before create/claim")),
        }
    }
}

impl Fragment for Card {
    fn create(&mut self, host: &Host) {
        let doc = &host.document;
        let h1 = dom::element(doc, "h1");
        self.title_text = Some(dom::text(doc, &self.title));
        self.gap = Some(dom::space(doc));
        self.p = Some(dom::element(doc, "p"));
        self.body_text = Some(dom::text(doc, &self.body));
        dom::attr(doc, h1, "class", Some(&self.tone));
        self.h1 = Some(h1);
    }

    fn claim(&mut self, host: &Host, nodes: &mut NodeList) {
        let doc = &host.document;

        let h1 = claim_element(host, nodes, "h1", &["class"]);
        let mut h1_nodes = NodeList::children_of(doc, h1);
        self.title_text = Some(claim_text(host, &mut h1_nodes, &self.title));
        h1_nodes.detach_unclaimed(doc);

        self.gap = Some(claim_space(host, nodes));

        let p = claim_element(host, nodes, "p", &[]);
        let mut p_nodes = NodeList::children_of(doc, p);
        self.body_text = Some(claim_text(host, &mut p_nodes, &self.body));
        p_nodes.detach_unclaimed(doc);

        dom::attr(doc, h1, "class", Some(&self.tone));
        self.h1 = Some(h1);
        self.p = Some(p);
    }

    fn mount(&mut self, host: &Host, target: NodeId, anchor: Option<NodeId>) -> Result<(), FragmentError> {
        let [h1, title, gap, p, body] = self.nodes()?;
        insert_hydration(host, target, h1, anchor)?;
        append_hydration(host, h1, title)?;
        insert_hydration(host, target, gap, anchor)?;
        insert_hydration(host, target, p, anchor)?;
        append_hydration(host, p, body)?;
        Ok(())
    }

    fn patch(&mut self, host: &Host, ctx: &[Value], dirty: &DirtyMask) -> Result<(), FragmentError> {
        let [h1, title, _, _, body] = self.nodes()?;
        let doc = &host.document;
        if dirty.is_dirty(0) {
            dom::set_data(doc, title, &ctx[0].to_text());
        }
        if dirty.is_dirty(1) {
            dom::attr(doc, h1, "class", Some(&ctx[1].to_text()));
        }
        if dirty.is_dirty(2) {
            dom::set_data(doc, body, &ctx[2].to_text());
        }
        Ok(())
    }

    fn destroy(&mut self, host: &Host, detaching: bool) {
        if detaching {
            for node in [self.h1, self.gap, self.p].into_iter().flatten() {
                dom::detach(&host.document, node);
            }
        }
    }
}

fn card() -> ComponentDefinition {
    ComponentDefinition::new("Card")
        .prop("title", 0)
        .prop("tone", 1)
        .prop("body", 2)
        .fragment(|_, ctx| Box::new(Card::new(ctx)))
}

fn props(title: &str) -> Props {
    Props::new()
        .with("title", title)
        .with("tone", "hero")
        .with("body", "Body text")
}

const NONE: &[(&str, &str)] = &[];

/// Build markup the way a server would have sent it.
fn server_markup(doc: &Document, parts: &[(&str, &[(&str, &str)], &str)]) -> NodeId {
    let root = doc.create_element("main");
    for &(tag, attributes, text) in parts {
        let node = if tag == "#text" {
            doc.create_text(text)
        } else {
            let node = doc.create_element(tag);
            for &(key, value) in attributes {
                doc.set_attribute(node, key, value);
            }
            let child = doc.create_text(text);
            doc.append_child(node, child).unwrap();
            node
        };
        doc.append_child(root, node).unwrap();
    }
    root
}

fn hydrate(host: &Host, scheduler: &Scheduler, root: NodeId, title: &str) -> Component {
    init(
        scheduler,
        host,
        ComponentOptions::new().target(root).hydrate(true).props(props(title)),
        card(),
    )
    .unwrap()
}

#[test]
fn test_matching_markup_is_reused_in_place() {
    let host = Host::new();
    let doc = &host.document;
    let root = server_markup(
        doc,
        &[
            ("h1", &[("class", "hero"), ("data-ssr", "1")][..], "Hello"),
            ("#text", NONE, " "),
            ("p", NONE, "Body text"),
        ],
    );
    let live_before = doc.children(root);
    doc.reset_stats();

    hydrate(&host, &Scheduler::new(), root, "Hello");

    let stats = doc.stats();
    assert_eq!(stats.created, 0);
    assert_eq!(stats.moved, 0);
    assert_eq!(stats.inserted, 0);
    assert_eq!(doc.children(root), live_before);
    assert_eq!(doc.inner_html(root), r#"<h1 class="hero">Hello</h1> <p>Body text</p>"#);
    assert!(!host.is_hydrating());
}

#[test]
fn test_shuffled_markup_is_repaired() {
    let host = Host::new();
    let doc = &host.document;
    let root = server_markup(
        doc,
        &[
            ("p", NONE, "Body text"),
            ("h1", &[("class", "hero")][..], "Hello world"),
            ("div", NONE, "stale"),
        ],
    );
    doc.reset_stats();

    hydrate(&host, &Scheduler::new(), root, "Hello");

    assert_eq!(doc.inner_html(root), r#"<h1 class="hero">Hello</h1> <p>Body text</p>"#);
    let stats = doc.stats();
    // The missing space and the split " world" remainder
    assert_eq!(stats.created, 2);
    assert_eq!(stats.moved, 1);
}

#[test]
fn test_updates_after_hydration_patch_claimed_nodes() {
    let host = Host::new();
    let doc = &host.document;
    let root = server_markup(
        doc,
        &[
            ("h1", &[("class", "hero")][..], "Hello"),
            ("#text", NONE, " "),
            ("p", NONE, "Body text"),
        ],
    );
    let scheduler = Scheduler::new();
    let component = hydrate(&host, &scheduler, root, "Hello");
    let h1 = doc.first_child(root).unwrap();
    doc.reset_stats();

    component.set_props(Props::new().with("title", "Goodbye").with("tone", "muted"));
    scheduler.tick().unwrap();

    assert_eq!(doc.first_child(root), Some(h1));
    assert_eq!(doc.inner_html(root), r#"<h1 class="muted">Goodbye</h1> <p>Body text</p>"#);
    assert_eq!(doc.stats().created, 0);
}

#[test]
fn test_client_render_builds_same_markup() {
    let host = Host::new();
    let doc = &host.document;
    let root = doc.create_element("main");
    let scheduler = Scheduler::new();

    let component = init(
        &scheduler,
        &host,
        ComponentOptions::new().target(root).props(props("Hello")),
        card(),
    )
    .unwrap();
    assert_eq!(doc.inner_html(root), r#"<h1 class="hero">Hello</h1> <p>Body text</p>"#);

    component.destroy();
    assert_eq!(doc.inner_html(root), "");
    assert!(doc.children(root).is_empty());
}

#[test]
fn test_anchor_mount_keeps_trailing_content() {
    let host = Host::new();
    let doc = &host.document;
    let root = doc.create_element("main");
    let footer = doc.create_element("footer");
    doc.append_child(root, footer).unwrap();

    init(
        &Scheduler::new(),
        &host,
        ComponentOptions::new().target(root).anchor(footer).props(props("Hi")),
        card(),
    )
    .unwrap();

    assert_eq!(
        doc.inner_html(root),
        r#"<h1 class="hero">Hi</h1> <p>Body text</p><footer></footer>"#
    );
}
