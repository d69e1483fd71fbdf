//! Slack message texts for the lunch bot.

use slack::{Action, Attachment, Confirm, SlackMessage};

use super::models::{EventKey, GroupAssignment};
use super::orchestrator::{MembershipOutcome, ShowGroupsOutcome, StatusReport};

/// Button name shared by the join and cancel actions.
pub const ACTION_NAME: &str = "lunch";
pub const JOIN_VALUE: &str = "join";
pub const LEAVE_VALUE: &str = "leave";

const CALLBACK_ID: &str = "social_lunch";

/// Participant counts up to this size are not advertised.
const VISIBLE_COUNT_THRESHOLD: usize = 6;

#[derive(Debug, Clone)]
pub struct LunchMessages {
    channel_id: String,
    publish_hour: u32,
    slash_command: String,
}

impl LunchMessages {
    pub fn new(
        channel_id: impl Into<String>,
        publish_hour: u32,
        slash_command: impl Into<String>,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            publish_hour,
            slash_command: slash_command.into(),
        }
    }

    pub fn status(&self, report: &StatusReport) -> SlackMessage {
        match report {
            StatusReport::Open {
                event,
                participant_count,
                is_member: true,
            } => self.joined(*event, *participant_count),
            StatusReport::Open {
                event,
                participant_count,
                is_member: false,
            } => SlackMessage::text(format!(
                "Hi there! :wave:\n\n\
                 I'll set you up for an exciting lunch together with 2-4 other random coworkers :awesome:\n\
                 Next lunch date is *{}*\n{}",
                lunch_date(*event),
                count_line(*participant_count)
            ))
            .with_attachment(join_attachment()),
            StatusReport::Published {
                was_member,
                groups_formed,
                ..
            } => self.after_publish(*was_member, *groups_formed),
        }
    }

    pub fn membership(&self, outcome: &MembershipOutcome) -> SlackMessage {
        match outcome {
            MembershipOutcome::Updated {
                event,
                participant_count,
                is_member: true,
            } => self.joined(*event, *participant_count),
            MembershipOutcome::Updated {
                event,
                participant_count,
                is_member: false,
            } => SlackMessage::text(format!(
                "You have left the next lunch on *{}* :feelsbadman:\n{}Please, reconsider your decision.\n",
                lunch_date(*event),
                count_line(*participant_count)
            ))
            .with_attachment(join_attachment()),
            MembershipOutcome::TooLate {
                was_member: true,
                groups_formed,
                ..
            } => SlackMessage::text(format!(
                "Too late! This week's lunch groups are already settled, so your sign-up can't be changed anymore.\n\n{}",
                self.after_publish(true, *groups_formed).text
            )),
            MembershipOutcome::TooLate {
                was_member: false,
                groups_formed,
                ..
            } => self.after_publish(false, *groups_formed),
        }
    }

    pub fn reminder(&self, event: EventKey, participant_count: usize, is_today: bool) -> SlackMessage {
        SlackMessage::text(format!(
            "Hi all! :wave:\n\n\
             Remember, I'm arranging once every week an exciting lunch event, shuffling people in groups \
             of 3-5 random coworkers who will go together for lunch :awesome:\n\
             Next lunch date is {}*{}*\n{}\n\
             Join now by running the command `{}`!\n\
             (you can run it in your private Slack channel - no one will see it except you)",
            if is_today { "*TODAY,* " } else { "" },
            lunch_date(event),
            count_line(participant_count),
            self.slash_command
        ))
    }

    /// Announcement of the published groups, or the not-enough-people notice.
    pub fn group_list(&self, event: EventKey, assignment: &GroupAssignment) -> SlackMessage {
        if assignment.is_empty() {
            return SlackMessage::text(
                "Too bad! There weren't enough people for a social lunch group today (min. 3) :feelsbadman:\n\
                 Let's hope more people join next time!",
            );
        }

        let groups = assignment
            .groups()
            .iter()
            .enumerate()
            .map(|(i, group)| {
                let members: Vec<String> = group.iter().map(|id| id.mention()).collect();
                format!("*Group {}:*\n{}\n", i + 1, members.join("\n"))
            })
            .collect::<Vec<_>>()
            .join("\n");

        SlackMessage::text(format!(
            "These are the lunch groups for today, *{}*:\n\n{}\n\
             Group members, now you can talk to each other :scream: and agree a place/time for lunch.\n\
             Bon appétit! :awesome:",
            lunch_date(event),
            groups
        ))
    }

    pub fn show_groups(&self, outcome: &ShowGroupsOutcome) -> SlackMessage {
        match outcome {
            ShowGroupsOutcome::Sent { .. } => SlackMessage::text(format!(
                "I've posted this week's lunch groups to {} again.",
                self.channel_id
            )),
            ShowGroupsOutcome::NotPublished { event } => SlackMessage::text(format!(
                "The lunch groups for *{}* haven't been published yet. \
                 I'll post them to {} at {}.00 on the lunch day.",
                lunch_date(*event),
                self.channel_id,
                self.publish_hour
            )),
        }
    }

    fn joined(&self, event: EventKey, participant_count: usize) -> SlackMessage {
        SlackMessage::text(format!(
            "You have joined the next lunch on *{date}*! :feelsgoodman:\n{count}\
             I'll post a list with the lunch groups to {channel} on *{date} at {hour}.00*.\n",
            date = lunch_date(event),
            count = count_line(participant_count),
            channel = self.channel_id,
            hour = self.publish_hour
        ))
        .with_attachment(cancel_attachment())
    }

    fn after_publish(&self, was_member: bool, groups_formed: bool) -> SlackMessage {
        if !groups_formed {
            SlackMessage::text(format!(
                "This week's lunch day is today :hamburger:\n\
                 Unfortunately, there weren't enough people for a social lunch group this time (min. 3) :feelsbadman:\n\n\
                 Run `{}` again after today to join the lunch next week!",
                self.slash_command
            ))
        } else if was_member {
            SlackMessage::text(format!(
                "This week's lunch day is today :hamburger:\n\n\
                 Check the lunch groups published in {}!",
                self.channel_id
            ))
        } else {
            SlackMessage::text(format!(
                "This week's lunch day is today :hamburger:\n\
                 Unfortunately, the lunch groups have already been generated (check {}), \
                 so it's too late to join this time, sorry.\n\n\
                 Run `{}` again after today to join the lunch next week!",
                self.channel_id, self.slash_command
            ))
        }
    }
}

/// `Friday 4.1`
fn lunch_date(event: EventKey) -> String {
    event.date().format("%A %-d.%-m").to_string()
}

fn count_line(participant_count: usize) -> String {
    if participant_count > VISIBLE_COUNT_THRESHOLD {
        format!(
            "There are *{}* people waiting for the next lunch!\n",
            participant_count
        )
    } else {
        String::new()
    }
}

fn join_attachment() -> Attachment {
    Attachment::with_actions(
        CALLBACK_ID,
        vec![Action::button(ACTION_NAME, "Join", "primary", JOIN_VALUE)],
    )
}

fn cancel_attachment() -> Attachment {
    Attachment::with_actions(
        CALLBACK_ID,
        vec![
            Action::button(ACTION_NAME, "Cancel", "danger", LEAVE_VALUE).with_confirm(Confirm {
                title: "Are you sure you want to cancel?".to_string(),
                text: "Please, don't do it. Think about the kids.".to_string(),
                ok_text: "Yes".to_string(),
                dismiss_text: "No".to_string(),
            }),
        ],
    )
}
