// Region link groups - Regions sharing one interior content
//
// Membership lives on the regions (`Region::link_group`); the manager only
// tracks which group ids are alive. Ids are allocated lowest-free so that
// undo followed by redo hands out the same ids again.

use crate::arranger::identifier::RegionIdentifier;
use crate::arranger::region::LinkGroupId;
use crate::project::track::Tracklist;
use std::collections::BTreeSet;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LinkGroupError {
    #[error("{region} refers to missing {group}")]
    MissingGroup {
        region: RegionIdentifier,
        group: LinkGroupId,
    },

    #[error("{0} has no member regions")]
    EmptyGroup(LinkGroupId),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionLinkGroupManager {
    groups: BTreeSet<LinkGroupId>,
}

impl RegionLinkGroupManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the lowest free group id
    pub fn add_group(&mut self) -> LinkGroupId {
        let mut id = 0;
        while self.groups.contains(&LinkGroupId(id)) {
            id += 1;
        }
        let group = LinkGroupId(id);
        self.groups.insert(group);
        log::debug!("created {}", group);
        group
    }

    /// Re-registers a group recorded in a snapshot
    pub fn ensure_group(&mut self, group: LinkGroupId) {
        if self.groups.insert(group) {
            log::debug!("restored {}", group);
        }
    }

    pub fn remove_group(&mut self, group: LinkGroupId) -> bool {
        let removed = self.groups.remove(&group);
        if removed {
            log::debug!("removed {}", group);
        }
        removed
    }

    pub fn contains(&self, group: LinkGroupId) -> bool {
        self.groups.contains(&group)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> impl Iterator<Item = LinkGroupId> + '_ {
        self.groups.iter().copied()
    }

    /// Every region's group must exist and every group must have a member
    pub fn validate(&self, tracklist: &Tracklist) -> Result<(), LinkGroupError> {
        for region in tracklist.regions() {
            if let Some(group) = region.link_group {
                if !self.groups.contains(&group) {
                    return Err(LinkGroupError::MissingGroup {
                        region: region.id,
                        group,
                    });
                }
            }
        }
        for &group in &self.groups {
            if tracklist.regions_in_group(group).next().is_none() {
                return Err(LinkGroupError::EmptyGroup(group));
            }
        }
        Ok(())
    }
}
