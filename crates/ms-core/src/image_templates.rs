//! Collapse image templates that share a name.
//!
//! Templates pointing at a duplicate are repointed at the first image
//! template of its name group, and only then are the duplicates deleted, so
//! no template is ever left referencing a deleted record.

use indexmap::IndexMap;
use ms_client_api::ClientApi;
use ms_rest_api_contract::{ImageTemplate, RecordId, Template, TemplateUpdate};
use serde::Serialize;
use tracing::info;

use crate::{Error, Result};

/// Image templates sharing one name, first-fetched first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub name: String,
    /// Record kept and pointed at
    pub canonical: RecordId,
    /// Records to delete once nothing references them
    pub duplicates: Vec<RecordId>,
}

impl DuplicateGroup {
    pub fn is_duplicate(&self, record_id: RecordId) -> bool {
        self.duplicates.contains(&record_id)
    }
}

/// Outcome for one duplicate group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollapsedGroup {
    pub name: String,
    pub canonical: RecordId,
    pub updated_templates: Vec<RecordId>,
    pub deleted_image_templates: Vec<RecordId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollapseReport {
    pub groups: Vec<CollapsedGroup>,
}

impl CollapseReport {
    /// True when there was nothing to collapse
    pub fn is_noop(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn updated_template_count(&self) -> usize {
        self.groups.iter().map(|g| g.updated_templates.len()).sum()
    }

    pub fn deleted_image_template_count(&self) -> usize {
        self.groups.iter().map(|g| g.deleted_image_templates.len()).sum()
    }
}

/// Group by name, keeping both first-seen name order and fetch order
pub fn group_by_name(image_templates: &[ImageTemplate]) -> IndexMap<&str, Vec<&ImageTemplate>> {
    let mut groups: IndexMap<&str, Vec<&ImageTemplate>> = IndexMap::new();
    for image_template in image_templates {
        groups
            .entry(image_template.name.as_str())
            .or_default()
            .push(image_template);
    }
    groups
}

/// Names mapping to more than one image template
pub fn duplicate_groups(image_templates: &[ImageTemplate]) -> Vec<DuplicateGroup> {
    group_by_name(image_templates)
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(name, members)| DuplicateGroup {
            name: name.to_string(),
            canonical: members[0].record_id,
            duplicates: members[1..].iter().map(|m| m.record_id).collect(),
        })
        .collect()
}

/// Every template of every answer.
///
/// Templates are only reachable through answers; one not attached to any
/// answer is never seen here.
pub async fn fetch_all_templates<C>(client: &C) -> Result<Vec<Template>>
where
    C: ClientApi + ?Sized,
{
    let mut templates = Vec::new();
    for summary in client.list_answers().await? {
        let answer = client.get_answer(summary.record_id).await?;
        templates.extend(answer.templates);
    }
    Ok(templates)
}

/// Repoint templates at the canonical image template of each duplicated
/// name, then delete the duplicates
pub async fn collapse_duplicate_image_templates<C>(client: &C) -> Result<CollapseReport>
where
    C: ClientApi + ?Sized,
{
    let image_templates = client.list_image_templates().await?;
    let groups = duplicate_groups(&image_templates);
    info!("Duplicated image_templates: {}", groups.len());

    let mut report = CollapseReport::default();
    if groups.is_empty() {
        return Ok(report);
    }

    let mut templates = fetch_all_templates(client).await?;
    let total = groups.len();

    for (index, group) in groups.into_iter().enumerate() {
        info!(
            "[{}/{}] image_template_name {} is duplicated",
            index + 1,
            total,
            group.name
        );

        let updated_templates = repoint_templates(client, &mut templates, &group).await?;
        info!(
            "{} updated templates: {:?}",
            updated_templates.len(),
            updated_templates
        );

        // Only after every reference is moved away
        for &duplicate in &group.duplicates {
            client.delete_image_template(duplicate).await?;
        }
        info!(
            "{} deleted image_templates: {:?}",
            group.duplicates.len(),
            group.duplicates
        );

        report.groups.push(CollapsedGroup {
            name: group.name,
            canonical: group.canonical,
            updated_templates,
            deleted_image_templates: group.duplicates,
        });
    }

    Ok(report)
}

/// Templates referencing a duplicate of `group`, in fetch order
pub fn plan_repoints(templates: &[Template], group: &DuplicateGroup) -> Vec<RecordId> {
    templates
        .iter()
        .filter(|template| {
            template
                .image_template_record_id
                .is_some_and(|current| group.is_duplicate(current))
        })
        .map(|template| template.record_id)
        .collect()
}

/// Point every template referencing a duplicate of `group` at its canonical
/// record, locally and remotely. Returns the updated template ids.
async fn repoint_templates<C>(
    client: &C,
    templates: &mut [Template],
    group: &DuplicateGroup,
) -> Result<Vec<RecordId>>
where
    C: ClientApi + ?Sized,
{
    let planned = plan_repoints(templates, group);
    let update = TemplateUpdate {
        image_template_record_id: group.canonical,
    };

    for template in templates
        .iter_mut()
        .filter(|template| planned.contains(&template.record_id))
    {
        template.image_template_record_id = Some(group.canonical);
        client.update_template(template.record_id, &update).await?;
    }

    Ok(planned)
}

/// Names that still map to more than one image template
pub fn duplicate_names(image_templates: &[ImageTemplate]) -> Vec<String> {
    duplicate_groups(image_templates)
        .into_iter()
        .map(|group| group.name)
        .collect()
}

/// Sanity check: true when every image template name is unique
pub async fn image_templates_are_unique<C>(client: &C) -> Result<bool>
where
    C: ClientApi + ?Sized,
{
    Ok(duplicate_names(&client.list_image_templates().await?).is_empty())
}

/// Like [`image_templates_are_unique`], failing with the duplicated names
pub async fn assert_image_templates_unique<C>(client: &C) -> Result<()>
where
    C: ClientApi + ?Sized,
{
    let names = duplicate_names(&client.list_image_templates().await?);
    if names.is_empty() {
        Ok(())
    } else {
        Err(Error::DuplicatesRemain(names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn templates(entries: &[(RecordId, &str)]) -> Vec<ImageTemplate> {
        entries
            .iter()
            .map(|&(id, name)| ImageTemplate::new(id, name))
            .collect()
    }

    #[test]
    fn test_group_by_name_preserves_order() {
        let list = templates(&[(4, "B"), (1, "A"), (2, "B"), (3, "A")]);
        let groups = group_by_name(&list);

        let names: Vec<_> = groups.keys().copied().collect();
        assert_eq!(names, vec!["B", "A"]);
        let b: Vec<_> = groups["B"].iter().map(|it| it.record_id).collect();
        assert_eq!(b, vec![4, 2]);
    }

    #[test]
    fn test_duplicate_groups_first_fetched_is_canonical() {
        let list = templates(&[(7, "logo"), (3, "banner"), (5, "logo"), (1, "logo")]);
        assert_eq!(
            duplicate_groups(&list),
            vec![DuplicateGroup {
                name: "logo".to_string(),
                canonical: 7,
                duplicates: vec![5, 1],
            }]
        );
    }

    #[test]
    fn test_no_duplicates() {
        let list = templates(&[(1, "A"), (2, "B")]);
        assert!(duplicate_groups(&list).is_empty());
        assert!(duplicate_names(&list).is_empty());
        assert!(duplicate_groups(&[]).is_empty());
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let list = templates(&[(1, "Logo"), (2, "logo")]);
        assert!(duplicate_names(&list).is_empty());
    }

    #[test]
    fn test_plan_repoints_skips_canonical_and_text_templates() {
        let group = DuplicateGroup {
            name: "A".into(),
            canonical: 1,
            duplicates: vec![2, 4],
        };
        let templates = vec![
            Template::new(10, Some(2)),
            Template::new(11, Some(1)),
            Template::new(12, None),
            Template::new(13, Some(4)),
            Template::new(14, Some(3)),
        ];
        assert_eq!(plan_repoints(&templates, &group), vec![10, 13]);
    }

    #[test]
    fn test_report_counts() {
        let report = CollapseReport {
            groups: vec![
                CollapsedGroup {
                    name: "A".into(),
                    canonical: 1,
                    updated_templates: vec![10, 11],
                    deleted_image_templates: vec![2],
                },
                CollapsedGroup {
                    name: "B".into(),
                    canonical: 3,
                    updated_templates: vec![],
                    deleted_image_templates: vec![4, 5],
                },
            ],
        };
        assert!(!report.is_noop());
        assert_eq!(report.updated_template_count(), 2);
        assert_eq!(report.deleted_image_template_count(), 3);
        assert!(CollapseReport::default().is_noop());
    }
}
