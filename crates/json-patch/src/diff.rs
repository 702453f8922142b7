//! Structural diffing: derive a patch document from two targets.
//!
//! `diff(a, b)` produces operations that transform `a` into `b`:
//! entry-wise adds, removes, and recursive descents for keyed containers,
//! head-wise recursion with tail adds or removes for lists, and a single
//! `replace` wherever the shapes disagree or a scalar changed. Paths are
//! emitted in escaped pointer form.
//!
//! For dynamic and structured targets the generated `remove` carries the
//! reset-to-default semantics of those shapes, so re-applying a diff
//! reproduces `b` exactly for scalars, lists, and maps, and up to member
//! defaults for the other shapes.

use json_patch_pointer::format_pointer;

use crate::document::PatchDocument;
use crate::operation::Operation;
use crate::target::Target;

/// Compute a patch document turning `a` into `b`.
pub fn diff(a: &Target, b: &Target) -> PatchDocument {
    let mut doc = PatchDocument::new();
    let mut path = Vec::new();
    diff_into(a, b, &mut path, &mut doc);
    doc
}

fn diff_into(a: &Target, b: &Target, path: &mut Vec<String>, doc: &mut PatchDocument) {
    match (a, b) {
        (Target::Scalar(va), Target::Scalar(vb)) => {
            if va != vb {
                doc.push(Operation::replace(format_pointer(path), vb.clone()));
            }
        }
        (Target::List(la), Target::List(lb)) => {
            let common = la.items.len().min(lb.items.len());
            for i in 0..common {
                path.push(i.to_string());
                diff_into(&la.items[i], &lb.items[i], path, doc);
                path.pop();
            }
            // Grown tail: append in order.
            for item in &lb.items[common..] {
                path.push("-".to_string());
                doc.push(Operation::add(format_pointer(path), item.to_value()));
                path.pop();
            }
            // Shrunk tail: remove from the end so earlier indices stay valid.
            for i in (common..la.items.len()).rev() {
                path.push(i.to_string());
                doc.push(Operation::remove(format_pointer(path)));
                path.pop();
            }
        }
        (Target::Map(ma), Target::Map(mb)) => {
            for key in ma.entries.keys() {
                if !mb.entries.contains_key(key) {
                    path.push(key.to_segment());
                    doc.push(Operation::remove(format_pointer(path)));
                    path.pop();
                }
            }
            for (key, vb) in &mb.entries {
                path.push(key.to_segment());
                match ma.entries.get(key) {
                    Some(va) => diff_into(va, vb, path, doc),
                    None => doc.push(Operation::add(format_pointer(path), vb.to_value())),
                }
                path.pop();
            }
        }
        (Target::Dynamic(da), Target::Dynamic(db)) => {
            for name in da.entries.keys() {
                if !db.entries.contains_key(name) {
                    path.push(name.clone());
                    doc.push(Operation::remove(format_pointer(path)));
                    path.pop();
                }
            }
            for (name, vb) in &db.entries {
                path.push(name.clone());
                match da.entries.get(name) {
                    Some(va) => diff_into(va, vb, path, doc),
                    None => doc.push(Operation::add(format_pointer(path), vb.to_value())),
                }
                path.pop();
            }
        }
        (Target::Structured(sa), Target::Structured(sb))
            if sa.contract().name() == sb.contract().name() =>
        {
            // Same contract, same member set; diff member-wise.
            for member in sa.contract().members() {
                if let (Some(va), Some(vb)) = (sa.field(&member.name), sb.field(&member.name)) {
                    path.push(member.name.clone());
                    diff_into(va, vb, path, doc);
                    path.pop();
                }
            }
        }
        _ => {
            if a != b {
                doc.push(Operation::replace(format_pointer(path), b.to_value()));
            }
        }
    }
}
