//! Hydrate a server-rendered list, then update it.
//!
//! Run with `RUST_LOG=spark_hydrate=trace cargo run --example hydrate` to see
//! claims, reorder moves and flushes.

use spark_hydrate::{
    append_hydration, claim_element, claim_text, dom, init, insert_hydration, ComponentDefinition,
    ComponentOptions, DirtyMask, Document, Fragment, FragmentError, Host, NodeId, NodeList, Props,
    RuntimeError, Scheduler, Value,
};
use tracing_subscriber::EnvFilter;

/// `<ul><li>{item}</li>...</ul>` with a fixed item count.
struct List {
    items: Vec<String>,
    ul: Option<NodeId>,
    rows: Vec<(NodeId, NodeId)>,
}

impl List {
    fn new(ctx: &[Value]) -> Self {
        let items = ctx[0].as_list().unwrap_or_default().iter().map(Value::to_text).collect();
        Self {
            items,
            ul: None,
            rows: Vec::new(),
        }
    }
}

impl Fragment for List {
    fn create(&mut self, host: &Host) {
        let doc = &host.document;
        self.ul = Some(dom::element(doc, "ul"));
        self.rows = self
            .items
            .iter()
            .map(|item| (dom::element(doc, "li"), dom::text(doc, item)))
            .collect();
    }

    fn claim(&mut self, host: &Host, nodes: &mut NodeList) {
        let doc = &host.document;
        let ul = claim_element(host, nodes, "ul", &[]);
        let mut rows = NodeList::children_of(doc, ul);
        self.rows = self
            .items
            .iter()
            .map(|item| {
                let li = claim_element(host, &mut rows, "li", &[]);
                let mut text = NodeList::children_of(doc, li);
                let data = claim_text(host, &mut text, item);
                text.detach_unclaimed(doc);
                (li, data)
            })
            .collect();
        rows.detach_unclaimed(doc);
        self.ul = Some(ul);
    }

    fn mount(&mut self, host: &Host, target: NodeId, anchor: Option<NodeId>) -> Result<(), FragmentError> {
        let ul = self.ul.ok_or_else(|| FragmentError::msg("list mounted before create"))?;
        insert_hydration(host, target, ul, anchor)?;
        for &(li, text) in &self.rows {
            append_hydration(host, ul, li)?;
            append_hydration(host, li, text)?;
        }
        Ok(())
    }

    fn patch(&mut self, host: &Host, ctx: &[Value], dirty: &DirtyMask) -> Result<(), FragmentError> {
        if dirty.is_dirty(0) {
            let items = ctx[0].as_list().unwrap_or_default();
            for (&(_, text), item) in self.rows.iter().zip(items) {
                dom::set_data(&host.document, text, &item.to_text());
            }
        }
        Ok(())
    }

    fn destroy(&mut self, host: &Host, detaching: bool) {
        if detaching {
            if let Some(ul) = self.ul {
                dom::detach(&host.document, ul);
            }
        }
    }
}

fn server_markup(doc: &Document, items: &[&str]) -> Result<NodeId, RuntimeError> {
    let body = doc.create_element("body");
    let ul = doc.create_element("ul");
    doc.append_child(body, ul)?;
    for item in items {
        let li = doc.create_element("li");
        let text = doc.create_text(item);
        doc.append_child(li, text)?;
        doc.append_child(ul, li)?;
    }
    Ok(body)
}

fn main() -> Result<(), RuntimeError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let host = Host::new();
    let doc = &host.document;
    let scheduler = Scheduler::new();

    // Stale server output: rows in another order plus one extra
    let body = server_markup(doc, &["gamma", "alpha", "beta", "stale"])?;
    println!("server:   {}", doc.inner_html(body));
    doc.reset_stats();

    let todo = ComponentDefinition::new("TodoList")
        .prop("items", 0)
        .instance(|component, props, _| {
            component.on_mount(|| {
                println!("mounted");
                None
            });
            vec![props.get("items").cloned().unwrap_or_default()]
        })
        .fragment(|_, ctx| Box::new(List::new(ctx)));

    let items = Value::list(["alpha", "beta", "gamma"].map(Value::from));
    let component = init(
        &scheduler,
        &host,
        ComponentOptions::new()
            .target(body)
            .hydrate(true)
            .props(Props::new().with("items", items)),
        todo,
    )?;
    println!("hydrated: {}", doc.inner_html(body));
    println!("stats:    {:?}", doc.stats());

    let renamed = Value::list(["alpha", "beta", "delta"].map(Value::from));
    component.set_props(Props::new().with("items", renamed));
    scheduler.tick()?;
    println!("updated:  {}", doc.inner_html(body));

    component.destroy();
    println!("destroyed: {:?}", doc.inner_html(body));
    Ok(())
}
