//! Change values and their routing to per-operation handlers.

use std::fmt;

use tracing::debug;

use crate::error::TypesError;
use crate::types::SrChangeOper;
use crate::value::SrVal;
use crate::xpath::{parse_xpath, XPathNode};

/// One entry of a change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrChangeVal {
    /// What happened to the node.
    pub oper: SrChangeOper,
    /// Value before the change (absent for creations).
    pub old_val: Option<SrVal>,
    /// Value after the change (absent for deletions).
    pub new_val: Option<SrVal>,
}

/// Receives the nodes and data of one change.
///
/// `nodes` excludes the leading module container node.
pub trait ChangeValHandler {
    fn put(&mut self, nodes: &[XPathNode], data: &str) -> anyhow::Result<()>;
}

impl<F> ChangeValHandler for F
where
    F: FnMut(&[XPathNode], &str) -> anyhow::Result<()>,
{
    fn put(&mut self, nodes: &[XPathNode], data: &str) -> anyhow::Result<()> {
        self(nodes, data)
    }
}

impl SrChangeVal {
    /// Creates a change value.
    pub fn new(oper: SrChangeOper, old_val: Option<SrVal>, new_val: Option<SrVal>) -> Self {
        Self {
            oper,
            old_val,
            new_val,
        }
    }

    /// Creates a change describing a freshly read item.
    pub fn created(val: SrVal) -> Self {
        Self::new(SrChangeOper::Created, None, Some(val))
    }

    /// Returns the value the operation refers to: the new value for
    /// creations, modifications and moves, the old value for deletions.
    pub fn subject(&self) -> Option<&SrVal> {
        match self.oper {
            SrChangeOper::Deleted => self.old_val.as_ref(),
            _ => self.new_val.as_ref(),
        }
    }

    /// Routes this change to `create`, `modify` or `delete`.
    ///
    /// Moves are ignored.
    pub fn dispatch(
        &self,
        create: &mut dyn ChangeValHandler,
        modify: &mut dyn ChangeValHandler,
        delete: &mut dyn ChangeValHandler,
    ) -> anyhow::Result<()> {
        let handler: &mut dyn ChangeValHandler = match self.oper {
            SrChangeOper::Created => create,
            SrChangeOper::Modified => modify,
            SrChangeOper::Deleted => delete,
            SrChangeOper::Moved => {
                debug!("Ignoring {}", self);
                return Ok(());
            }
        };

        let val = self.subject().ok_or(TypesError::MissingValue {
            oper: self.oper.name(),
        })?;

        let nodes = parse_xpath(&val.xpath)?;
        let rest = nodes.get(1..).unwrap_or(&[]);
        handler.put(rest, &val.data)
    }
}

impl fmt::Display for SrChangeVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.oper)?;
        match (&self.old_val, &self.new_val) {
            (Some(old), Some(new)) => write!(f, "{} -> {}", old, new),
            (Some(old), None) => write!(f, "{}", old),
            (None, Some(new)) => write!(f, "{}", new),
            (None, None) => f.write_str("<nil>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SrType;
    use anyhow::bail;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(Vec<String>, String)>,
    }

    impl ChangeValHandler for Recorder {
        fn put(&mut self, nodes: &[XPathNode], data: &str) -> anyhow::Result<()> {
            self.calls.push((
                nodes.iter().map(XPathNode::node_name).collect(),
                data.to_string(),
            ));
            Ok(())
        }
    }

    fn mtu(value: &str) -> SrVal {
        SrVal::new(
            "/oc-if:interfaces/interface[name='eth1']/config/mtu",
            SrType::Uint16,
            false,
            value,
        )
    }

    #[test]
    fn test_dispatch_created() {
        let (mut cre, mut modi, mut del) = (Recorder::default(), Recorder::default(), Recorder::default());
        SrChangeVal::created(mtu("1500"))
            .dispatch(&mut cre, &mut modi, &mut del)
            .unwrap();

        assert_eq!(
            cre.calls,
            vec![(
                vec!["interface".to_string(), "config".to_string(), "mtu".to_string()],
                "1500".to_string()
            )]
        );
        assert!(modi.calls.is_empty());
        assert!(del.calls.is_empty());
    }

    #[test]
    fn test_dispatch_modified_uses_new_value() {
        let (mut cre, mut modi, mut del) = (Recorder::default(), Recorder::default(), Recorder::default());
        SrChangeVal::new(SrChangeOper::Modified, Some(mtu("1500")), Some(mtu("9000")))
            .dispatch(&mut cre, &mut modi, &mut del)
            .unwrap();

        assert_eq!(modi.calls.len(), 1);
        assert_eq!(modi.calls[0].1, "9000");
    }

    #[test]
    fn test_dispatch_deleted_uses_old_value() {
        let (mut cre, mut modi, mut del) = (Recorder::default(), Recorder::default(), Recorder::default());
        SrChangeVal::new(SrChangeOper::Deleted, Some(mtu("1500")), None)
            .dispatch(&mut cre, &mut modi, &mut del)
            .unwrap();

        assert_eq!(del.calls.len(), 1);
        assert_eq!(del.calls[0].1, "1500");
    }

    #[test]
    fn test_dispatch_moved_is_ignored() {
        let (mut cre, mut modi, mut del) = (Recorder::default(), Recorder::default(), Recorder::default());
        SrChangeVal::new(SrChangeOper::Moved, None, Some(mtu("1")))
            .dispatch(&mut cre, &mut modi, &mut del)
            .unwrap();
        assert!(cre.calls.is_empty() && modi.calls.is_empty() && del.calls.is_empty());
    }

    #[test]
    fn test_dispatch_missing_value() {
        let (mut cre, mut modi, mut del) = (Recorder::default(), Recorder::default(), Recorder::default());
        let err = SrChangeVal::new(SrChangeOper::Deleted, None, Some(mtu("1")))
            .dispatch(&mut cre, &mut modi, &mut del)
            .unwrap_err();
        assert_eq!(err.to_string(), "change SR_OP_DELETED has no value");
    }

    #[test]
    fn test_dispatch_propagates_handler_error() {
        let mut cre = Recorder::default();
        let mut del = Recorder::default();
        let mut failing = |_: &[XPathNode], data: &str| -> anyhow::Result<()> {
            bail!("rejected {}", data)
        };

        let err = SrChangeVal::new(SrChangeOper::Modified, None, Some(mtu("70000")))
            .dispatch(&mut cre, &mut failing, &mut del)
            .unwrap_err();
        assert_eq!(err.to_string(), "rejected 70000");
    }

    #[test]
    fn test_dispatch_with_distinct_borrows() {
        // Each handler borrows its own local with its own lifetime.
        let mut created = Vec::new();
        let mut modified = Recorder::default();
        {
            let mut deleted = 0usize;
            let mut on_create = |nodes: &[XPathNode], data: &str| -> anyhow::Result<()> {
                created.push(format!("{}={}", nodes[0].attr("name", "?"), data));
                Ok(())
            };
            let mut on_delete = |_: &[XPathNode], _: &str| -> anyhow::Result<()> {
                deleted += 1;
                Ok(())
            };

            for change in [
                SrChangeVal::created(mtu("1500")),
                SrChangeVal::new(SrChangeOper::Modified, Some(mtu("1500")), Some(mtu("9000"))),
                SrChangeVal::new(SrChangeOper::Deleted, Some(mtu("9000")), None),
            ] {
                change
                    .dispatch(&mut on_create, &mut modified, &mut on_delete)
                    .unwrap();
            }
            assert_eq!(deleted, 1);
        }

        assert_eq!(created, vec!["eth1=1500".to_string()]);
        assert_eq!(modified.calls.len(), 1);
    }

    #[test]
    fn test_display() {
        let change = SrChangeVal::new(SrChangeOper::Modified, Some(mtu("1500")), Some(mtu("9000")));
        assert_eq!(
            change.to_string(),
            "SR_OP_MODIFIED: /oc-if:interfaces/interface[name='eth1']/config/mtu = 1500 SR_UINT16_T -> \
             /oc-if:interfaces/interface[name='eth1']/config/mtu = 9000 SR_UINT16_T"
        );

        let change = SrChangeVal::new(SrChangeOper::Deleted, None, None);
        assert_eq!(change.to_string(), "SR_OP_DELETED: <nil>");
    }
}
