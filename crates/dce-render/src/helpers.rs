//! Global template helpers:
//! - range: integers from `from` up to, not including, `to`
//! - render_partial: render another registered template with a context

use handlebars::{
    handlebars_helper, Context, Handlebars, Helper, HelperResult, Output, RenderContext,
    RenderErrorReason,
};

/// `[from, from + 1, ..., to - 1]`, empty when `to <= from`
pub fn range(from: i64, to: i64) -> Vec<i64> {
    (from..to).collect()
}

handlebars_helper!(range_helper: |from: i64, to: i64| range(from, to));

/// `{{render_partial "partials/model.html" this}}`
///
/// Without a context argument the current context is used.
fn render_partial_helper(
    h: &Helper,
    r: &Handlebars,
    ctx: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let name = h
        .param(0)
        .and_then(|v| v.value().as_str())
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("render_partial", 0))?;

    let markup = match h.param(1) {
        Some(context) => r.render(name, context.value())?,
        None => r.render(name, ctx.data())?,
    };
    out.write(&markup)?;
    Ok(())
}

pub(crate) fn register(handlebars: &mut Handlebars) {
    handlebars.register_helper("range", Box::new(range_helper));
    handlebars.register_helper("render_partial", Box::new(render_partial_helper));
}
